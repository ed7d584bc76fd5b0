use std::fs;
use std::path::Path;

/// MIME type used when nothing more specific is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Resolves the MIME type of a local file.
///
/// Returning `None` drops the file field it was asked about.
pub trait MimeDetector: Send + Sync {
	/// MIME type for `path`, or `None` for directories and unreadable entries.
	fn detect(&self, path: &Path) -> Option<String>;
}

/// Extension-based detection backed by `mime_guess`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuessMime;

impl MimeDetector for GuessMime {
	fn detect(&self, path: &Path) -> Option<String> {
		let metadata = fs::metadata(path).ok()?;
		if metadata.is_dir() {
			return None;
		}
		Some(mime_guess::from_path(path).first_or_octet_stream().to_string())
	}
}

impl<F> MimeDetector for F
where
	F: Fn(&Path) -> Option<String> + Send + Sync,
{
	fn detect(&self, path: &Path) -> Option<String> {
		self(path)
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::{GuessMime, MimeDetector};

	#[test]
	fn guesses_by_extension_and_falls_back_to_octet_stream() {
		let dir = tempfile::tempdir().expect("temp dir");
		let png = dir.path().join("avatar.png");
		let raw = dir.path().join("blob.unknownext");
		fs::write(&png, b"\x89PNG").expect("write png");
		fs::write(&raw, b"raw").expect("write raw");

		assert_eq!(GuessMime.detect(&png).as_deref(), Some("image/png"));
		assert_eq!(GuessMime.detect(&raw).as_deref(), Some("application/octet-stream"));
	}

	#[test]
	fn directories_and_missing_files_have_no_type() {
		let dir = tempfile::tempdir().expect("temp dir");
		assert_eq!(GuessMime.detect(dir.path()), None);
		assert_eq!(GuessMime.detect(&dir.path().join("missing.txt")), None);
	}
}
