use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use formwire_testkit::{fixture_path, target_dir};

/// Captured result of one `formwire` invocation.
pub(crate) struct Run {
	output: Output,
}

impl Run {
	pub(crate) fn code(&self) -> Option<i32> {
		self.output.status.code()
	}

	pub(crate) fn stdout(&self) -> &[u8] {
		&self.output.stdout
	}

	pub(crate) fn stderr(&self) -> String {
		String::from_utf8_lossy(&self.output.stderr).into_owned()
	}

	/// Fail the test with stderr unless the command exited successfully.
	pub(crate) fn success(self) -> Self {
		assert!(self.output.status.success(), "formwire exited with {}: {}", self.output.status, self.stderr());
		self
	}

	/// Successful run whose stdout is a JSON document.
	pub(crate) fn json(self) -> serde_json::Value {
		let run = self.success();
		serde_json::from_slice(run.stdout()).expect("stdout should be valid json")
	}
}

pub(crate) fn formwire(args: &[&str]) -> Run {
	let output = Command::new(binary()).args(args).output().expect("formwire command executes");
	Run { output }
}

/// Fixture path as a command-line argument.
pub(crate) fn fixture_arg(name: &str) -> String {
	path_arg(&fixture_path(name))
}

pub(crate) fn path_arg(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}

fn binary() -> &'static Path {
	static BINARY: OnceLock<PathBuf> = OnceLock::new();
	BINARY.get_or_init(|| match std::env::var_os("CARGO_BIN_EXE_formwire") {
		Some(path) => PathBuf::from(path),
		None => build_binary(),
	})
}

// Unit tests of a bin crate get no CARGO_BIN_EXE_* variable; build it once.
fn build_binary() -> PathBuf {
	let status = Command::new("cargo")
		.current_dir(env!("CARGO_MANIFEST_DIR"))
		.args(["build", "--quiet", "--bin", "formwire"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "cargo build --bin formwire failed with {status}");

	let name = format!("formwire{}", std::env::consts::EXE_SUFFIX);
	target_dir().join("debug").join(name)
}
