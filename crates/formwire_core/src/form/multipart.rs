use tracing::trace;
use uuid::Uuid;

use crate::form::FormDataItem;
use crate::form::mime::OCTET_STREAM;

const CRLF: &[u8] = b"\r\n";

/// Fresh random boundary token.
pub(crate) fn generate_boundary() -> String {
	format!("Boundary-{}", Uuid::new_v4().to_string().to_uppercase())
}

/// `Content-Type` header value for a body delimited by `boundary`.
pub(crate) fn content_type(boundary: &str) -> String {
	format!("multipart/form-data; boundary={boundary}")
}

/// Serialize `items` as a multipart body.
///
/// Each part is `--boundary`, a `Content-Disposition` line, a `Content-Type`
/// line for file parts, a blank line, then the raw payload. The body ends
/// with `--boundary--`. Every line ends in CRLF.
pub(crate) fn write_body(boundary: &str, items: &[FormDataItem]) -> Vec<u8> {
	let payload: usize = items.iter().map(|item| item.value().len()).sum();
	let mut body = Vec::with_capacity(payload + items.len() * (boundary.len() + 96) + boundary.len() + 6);

	for item in items {
		body.extend_from_slice(b"--");
		body.extend_from_slice(boundary.as_bytes());
		body.extend_from_slice(CRLF);

		body.extend_from_slice(b"Content-Disposition: form-data; name=\"");
		body.extend_from_slice(item.name().as_bytes());
		body.push(b'"');
		if let Some(filename) = item.filename() {
			body.extend_from_slice(b"; filename=\"");
			body.extend_from_slice(escape_quoted(filename).as_bytes());
			body.push(b'"');
			body.extend_from_slice(CRLF);
			body.extend_from_slice(b"Content-Type: ");
			body.extend_from_slice(item.mime().unwrap_or(OCTET_STREAM).as_bytes());
		}
		body.extend_from_slice(CRLF);
		body.extend_from_slice(CRLF);

		body.extend_from_slice(item.value());
		body.extend_from_slice(CRLF);
	}

	body.extend_from_slice(b"--");
	body.extend_from_slice(boundary.as_bytes());
	body.extend_from_slice(b"--");
	body.extend_from_slice(CRLF);

	trace!(parts = items.len(), bytes = body.len(), "serialized multipart body");
	body
}

// Backslash, quote and line breaks would end the quoted header value early.
fn escape_quoted(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	for ch in value.chars() {
		match ch {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			'\r' => out.push_str("%0D"),
			'\n' => out.push_str("%0A"),
			other => out.push(other),
		}
	}
	out
}
