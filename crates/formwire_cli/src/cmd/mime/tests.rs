use std::fs;

use crate::cmd::test_support::{formwire, path_arg};

#[test]
fn mime_json_lists_files_and_skips_directories() {
	let dir = tempfile::tempdir().expect("temp dir");
	fs::write(dir.path().join("b.txt"), b"text").expect("write txt");
	fs::write(dir.path().join("a.png"), b"png").expect("write png");
	fs::write(dir.path().join("c.unknownext"), b"raw").expect("write raw");
	fs::create_dir(dir.path().join("nested")).expect("create dir");

	let json = formwire(&["mime", &path_arg(dir.path()), "--json"]).json();

	let rows = json.as_array().expect("mime output is an array");
	assert_eq!(rows.len(), 3);
	assert_eq!(rows[0]["name"], "a.png");
	assert_eq!(rows[0]["mime"], "image/png");
	assert_eq!(rows[1]["name"], "b.txt");
	assert_eq!(rows[1]["mime"], "text/plain");
	assert_eq!(rows[2]["mime"], "application/octet-stream");
}
