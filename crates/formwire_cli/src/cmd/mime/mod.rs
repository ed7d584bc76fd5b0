use std::fs;
use std::path::PathBuf;

use formwire::form::{GuessMime, MimeDetector, Result};
use tracing::debug;

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub dir: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// List the files of a directory with their detected MIME types.
pub fn run(args: Args) -> Result<()> {
	let Args { dir, json } = args;

	let mut paths = Vec::new();
	for entry in fs::read_dir(&dir)? {
		paths.push(entry?.path());
	}
	paths.sort();

	let mut rows = Vec::new();
	for path in paths {
		let Some(mime) = GuessMime.detect(&path) else {
			debug!(path = %path.display(), "skipping entry without mime type");
			continue;
		};
		let name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
		rows.push(MimeJson { name, mime });
	}

	if json {
		return emit_json(&rows);
	}

	println!("dir: {}", dir.display());
	for row in &rows {
		println!("  {}: {}", row.name, row.mime);
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct MimeJson {
	name: String,
	mime: String,
}

#[cfg(test)]
mod tests;
