use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use url::Url;

use super::{FieldValue, FormData, FormValue, encode_name};
use crate::form::DateStrategy;

fn file_url(path: &Path) -> Url {
	Url::from_file_path(path).expect("absolute temp path")
}

#[test]
fn set_replaces_every_same_named_item() {
	let mut form = FormData::with_boundary("B");
	form.append("color", "red");
	form.append("size", "L");
	form.append("color", "green");

	form.set("color", "blue");
	assert_eq!(form.get("color"), Some(FieldValue::Text("blue")));
	assert_eq!(form.get_all("color"), [FieldValue::Text("blue")]);
	assert_eq!(form.len(), 2);
}

#[test]
fn append_keeps_existing_items() {
	let mut form = FormData::with_boundary("B");
	for n in 0..5_u32 {
		form.append("n", n);
	}
	let all = form.get_all("n");
	assert_eq!(all.len(), 5);
	assert_eq!(all[4], FieldValue::Text("4"));
	assert_eq!(form.get("n"), Some(FieldValue::Text("0")));
}

#[test]
fn delete_removes_all_and_has_reflects_it() {
	let mut form = FormData::with_boundary("B");
	form.append("a", "1");
	form.append("a", "2");
	form.append("b", "3");
	assert!(form.has("a"));

	form.delete("a");
	assert!(!form.has("a"));
	assert_eq!(form.get("a"), None);
	assert!(form.get_all("a").is_empty());
	assert_eq!(form.len(), 1);
}

#[test]
fn keys_are_distinct_in_first_seen_order() {
	let mut form = FormData::with_boundary("B");
	form.append("b", "1");
	form.append("a", "2");
	form.append("b", "3");
	form.append("c", "4");
	let keys: Vec<&str> = form.keys().collect();
	assert_eq!(keys, ["b", "a", "c"]);

	let values: Vec<FieldValue<'_>> = form.values().collect();
	assert_eq!(values.len(), 4);
}

#[test]
fn names_are_percent_encoded_and_lookups_match() {
	let mut form = FormData::with_boundary("B");
	form.append("full name", "Ada Lovelace");
	form.append("tags[0]", "x");
	form.append("é", "accent");

	let keys: Vec<&str> = form.keys().collect();
	assert_eq!(keys, ["full%20name", "tags[0]", "%C3%A9"]);
	assert_eq!(form.get("full name"), Some(FieldValue::Text("Ada Lovelace")));
	assert!(form.has("é"));

	form.set("full name", "Grace Hopper");
	assert_eq!(form.get_all("full name"), [FieldValue::Text("Grace Hopper")]);
}

#[test]
fn encode_name_keeps_query_safe_characters() {
	assert_eq!(encode_name("a.b[0]-c_d~e"), "a.b[0]-c_d~e");
	assert_eq!(encode_name("q=1&r=2?/:@!$'()*+,;"), "q=1&r=2?/:@!$'()*+,;");
	assert_eq!(encode_name("100% \"sure\" #1"), "100%25%20%22sure%22%20%231");
}

#[test]
fn values_are_not_percent_encoded() {
	let mut form = FormData::with_boundary("B");
	form.append("q", "a b&c");
	assert_eq!(form.items()[0].value(), b"a b&c");
}

#[test]
fn scalar_conversions_use_canonical_text() {
	let mut form = FormData::with_boundary("B");
	form.append("price", Decimal::new(314, 2));
	form.append("ok", true);
	form.append("ratio", 0.5_f64);
	assert_eq!(form.get("price"), Some(FieldValue::Text("3.14")));
	assert_eq!(form.get("ok"), Some(FieldValue::Text("true")));
	assert_eq!(form.get("ratio"), Some(FieldValue::Text("0.5")));
}

#[test]
fn binary_payloads_get_default_or_explicit_metadata() {
	let mut form = FormData::with_boundary("B");
	form.append("raw", vec![0_u8, 159, 146, 150]);
	form.append("photo", FormValue::file(vec![1, 2], "me.jpg", "image/jpeg"));

	let raw = &form.items()[0];
	assert_eq!(raw.filename(), Some("data"));
	assert_eq!(raw.mime(), Some("application/octet-stream"));
	assert_eq!(form.get("raw"), Some(FieldValue::Blob(&[0, 159, 146, 150])));

	let photo = &form.items()[1];
	assert_eq!(photo.filename(), Some("me.jpg"));
	assert_eq!(photo.mime(), Some("image/jpeg"));
}

#[test]
fn append_raw_classifies_by_utf8_validity() {
	let mut form = FormData::with_boundary("B");
	form.append_raw("note", "héllo".as_bytes().to_vec());
	form.append_raw("junk", vec![0xC3, 0x28]);

	assert_eq!(form.get("note"), Some(FieldValue::Text("héllo")));
	assert!(!form.items()[0].is_file());
	assert_eq!(form.get("junk"), Some(FieldValue::Blob(&[0xC3, 0x28])));
	assert_eq!(form.items()[1].filename(), Some("data"));
}

#[test]
fn remote_urls_are_stored_as_text() {
	let mut form = FormData::with_boundary("B");
	form.append("home", Url::parse("https://example.test/profile?id=7").expect("valid url"));
	assert_eq!(form.get("home"), Some(FieldValue::Text("https://example.test/profile?id=7")));
}

#[test]
fn local_file_url_is_read_with_detected_mime() {
	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join("notes.txt");
	fs::write(&path, b"hello file").expect("write fixture");

	let mut form = FormData::with_boundary("B");
	form.append("upload", file_url(&path));
	assert_eq!(form.len(), 1);

	let item = &form.items()[0];
	assert_eq!(item.filename(), Some("notes.txt"));
	assert_eq!(item.mime(), Some("text/plain"));
	assert_eq!(item.value(), b"hello file");
}

#[test]
fn file_url_without_mime_is_dropped() {
	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join("photo.png");
	fs::write(&path, b"png").expect("write fixture");

	let mut form = FormData::with_boundary("B").with_mime_detector(|_: &Path| -> Option<String> { None });
	form.append("a", "kept");
	form.append("upload", file_url(&path));
	assert_eq!(form.len(), 1);
	assert!(!form.has("upload"));
}

#[test]
fn unreadable_file_url_is_dropped() {
	let dir = tempfile::tempdir().expect("temp dir");
	let missing = dir.path().join("gone.bin");

	let mut form = FormData::with_boundary("B").with_mime_detector(|_: &Path| Some("application/octet-stream".to_owned()));
	form.append("upload", file_url(&missing));
	assert!(form.is_empty());

	let mut directory = FormData::with_boundary("B");
	directory.append("upload", file_url(dir.path()));
	assert!(directory.is_empty());
}

#[test]
fn dates_follow_the_form_strategy() {
	let date = Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid timestamp");

	let mut form = FormData::with_boundary("B");
	form.append("deferred", date);
	assert_eq!(form.get("deferred"), Some(FieldValue::Text("")));

	form.date_strategy = DateStrategy::formatted("%d.%m.%Y").expect("valid pattern");
	form.append("formatted", date);
	assert_eq!(form.get("formatted"), Some(FieldValue::Text("14.11.2023")));
}

#[test]
fn new_forms_get_distinct_stable_boundaries() {
	let mut first = FormData::new();
	let second = FormData::new();
	assert_ne!(first.boundary(), second.boundary());

	let before = first.boundary().to_owned();
	first.append("a", "1");
	let _ = first.body_for_http_request();
	first.append("b", "2");
	assert_eq!(first.boundary(), before);
	assert_eq!(first.content_type_for_http_request(), format!("multipart/form-data; boundary={before}"));
}

#[test]
fn field_views_expose_text_only_for_text_parts() {
	let mut form = FormData::with_boundary("B");
	form.append("note", "hi");
	form.append("raw", vec![1_u8, 2]);

	let views: Vec<Option<&str>> = form.items().iter().map(|item| FieldValue::from_item(item).and_then(|view| view.as_text())).collect();
	assert_eq!(views, [Some("hi"), None]);
}
