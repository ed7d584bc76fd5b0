//! Shared test helpers for workspace crates.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Load a JSON fixture from `<workspace>/fixtures`.
pub fn fixture_json(name: &str) -> serde_json::Value {
	let path = fixture_path(name);
	let bytes = fs::read(&path).unwrap_or_else(|err| panic!("fixture {} readable: {err}", path.display()));
	serde_json::from_slice(&bytes).unwrap_or_else(|err| panic!("fixture {} is valid json: {err}", path.display()))
}

/// File written into a private temporary directory, removed on drop.
pub struct TempFixture {
	/// Owning temporary directory.
	pub dir: TempDir,
	/// Path of the written file.
	pub path: PathBuf,
}

/// Write `contents` to `name` inside a fresh temporary directory.
pub fn write_temp_fixture(name: &str, contents: impl AsRef<[u8]>) -> TempFixture {
	let dir = tempfile::tempdir().expect("temp dir is created");
	let path = dir.path().join(name);
	fs::write(&path, contents).expect("temp fixture is written");
	TempFixture { dir, path }
}

/// Write `value` as JSON to `name` inside a fresh temporary directory.
pub fn write_json_fixture(name: &str, value: &serde_json::Value) -> TempFixture {
	write_temp_fixture(name, value.to_string())
}
