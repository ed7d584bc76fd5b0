use std::fs;
use std::path::Path;

use formwire::form::{FieldValue, FormDataItem, FormError, Result};
use serde::Serialize;
use serde_json::Value;

/// Date strategy shared by every command reading documents.
pub(crate) const DEFAULT_DATE_STRATEGY: &str = "iso8601";

/// Read and parse a JSON document.
pub(crate) fn read_json(path: &Path) -> Result<Value> {
	let bytes = fs::read(path)?;
	serde_json::from_slice(&bytes).map_err(|err| FormError::Custom(format!("invalid json in {}: {err}", path.display())))
}

/// Pretty-print a serializable payload to stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload).map_err(|err| FormError::Custom(format!("json output failed: {err}")))?;
	println!("{text}");
	Ok(())
}

/// Short printable rendering of a stored part: its text, or its size for
/// file parts.
pub(crate) fn part_text(item: &FormDataItem) -> String {
	match FieldValue::from_item(item).and_then(|value| value.as_text()) {
		Some(text) => text.to_owned(),
		None => format!("<{} bytes>", item.value().len()),
	}
}
