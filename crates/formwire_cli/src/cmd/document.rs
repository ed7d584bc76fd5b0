use chrono::{DateTime, Utc};
use formwire::form::{Encodable, EncodedValue, Encoder, Result};
use serde_json::Value;
use url::Url;

/// JSON value encoded with CLI conventions.
///
/// Strings holding `file:` URLs become file attachments and strings holding
/// RFC 3339 timestamps become dates, so the date strategy applies to them.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a>(pub &'a Value);

impl Encodable for Document<'_> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		match self.0 {
			Value::Object(map) => {
				let mut container = encoder.keyed_container()?;
				for (key, value) in map {
					container.encode(key, &Document(value))?;
				}
			}
			Value::Array(items) => {
				let mut container = encoder.indexed_container()?;
				for item in items {
					container.encode(&Document(item))?;
				}
			}
			Value::String(text) => {
				let mut slot = encoder.single_value_container()?;
				if let Some(url) = file_url(text) {
					slot.encode_url(url);
				} else if let Some(date) = timestamp(text) {
					slot.encode_date(date)?;
				} else {
					slot.encode_str(text);
				}
			}
			Value::Number(number) => encoder.single_value_container()?.encode_value(EncodedValue::Number(number.to_string())),
			Value::Bool(flag) => encoder.single_value_container()?.encode_bool(*flag),
			Value::Null => encoder.single_value_container()?.encode_null(),
		}
		Ok(())
	}
}

fn file_url(text: &str) -> Option<Url> {
	if !text.starts_with("file:") {
		return None;
	}
	Url::parse(text).ok()
}

fn timestamp(text: &str) -> Option<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(text).ok().map(|date| date.with_timezone(&Utc))
}
