use std::fs;

use formwire_testkit::{fixture_path, write_json_fixture};
use serde_json::json;
use url::Url;

use crate::cmd::test_support::{fixture_arg, formwire, path_arg};

#[test]
fn encode_writes_framed_body_and_reports_content_type() {
	let fixture = fixture_arg("signup.json");
	let out_dir = tempfile::tempdir().expect("temp dir");
	let out = out_dir.path().join("body.bin");

	let run = formwire(&["encode", &fixture, "--boundary", "XYZ", "--date-strategy", "seconds", "--out", &path_arg(&out)]).success();
	assert!(run.stderr().contains("content-type: multipart/form-data; boundary=XYZ"));
	assert!(run.stdout().is_empty());

	let body = fs::read(&out).expect("body written");
	let text = String::from_utf8(body).expect("text-only body");
	assert!(text.starts_with("--XYZ\r\nContent-Disposition: form-data; name=\"username\"\r\n\r\nbob\r\n"));
	assert!(text.ends_with("--XYZ--\r\n"));
	assert!(text.contains("name=\"price\"\r\n\r\n3.14\r\n"));
	assert!(text.contains("name=\"address.lines[1]\"\r\n\r\nApt 2\r\n"));
	assert!(text.contains("name=\"joined\"\r\n\r\n1700000000\r\n"));
	assert_eq!(text.matches("--XYZ\r\n").count(), 11);
}

#[test]
fn encode_attaches_file_urls() {
	let notes = Url::from_file_path(fixture_path("notes.txt")).expect("absolute fixture path");
	let input = write_json_fixture("upload.json", &json!({"title": "report", "doc": notes.as_str()}));

	let run = formwire(&["encode", &path_arg(&input.path), "--boundary", "B"]).success();
	let body = String::from_utf8_lossy(run.stdout());
	assert!(body.contains("Content-Disposition: form-data; name=\"doc\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\nhello from a fixture\n\r\n"));
}

#[test]
fn encode_rejects_non_object_documents() {
	let input = write_json_fixture("list.json", &json!([1, 2]));

	let run = formwire(&["encode", &path_arg(&input.path)]);
	assert_eq!(run.code(), Some(1));
	assert!(run.stderr().contains("error: root element should be an object, got array"));
}

#[test]
fn encode_and_fields_share_default_date_rendering() {
	let fixture = fixture_arg("signup.json");
	let listed = formwire(&["fields", &fixture, "--select", "joined", "--json"]).json();
	assert_eq!(listed[0]["value"], "2023-11-14T22:13:20Z");

	let run = formwire(&["encode", &fixture, "--boundary", "B"]).success();
	let body = String::from_utf8_lossy(run.stdout());
	assert!(body.contains("name=\"joined\"\r\n\r\n2023-11-14T22:13:20Z\r\n"));
}
