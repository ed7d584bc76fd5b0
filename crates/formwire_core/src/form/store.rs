use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::slice;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use rust_decimal::Decimal;
use tracing::debug;
use url::Url;

use crate::form::impls::{Blob, Numeric};
use crate::form::mime::{GuessMime, MimeDetector, OCTET_STREAM};
use crate::form::multipart;
use crate::form::{DateStrategy, Scalar};

/// Characters escaped in field names: everything outside the URL query set
/// except the brackets used by flattened array paths.
const NAME_ENCODE_SET: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'<')
	.add(b'>')
	.add(b'\\')
	.add(b'^')
	.add(b'`')
	.add(b'{')
	.add(b'|')
	.add(b'}');

/// Filename given to binary payloads appended without one.
pub const DEFAULT_BLOB_FILENAME: &str = "data";

/// Percent-encode a field name the way [`FormData`] stores it.
pub fn encode_name(name: &str) -> String {
	utf8_percent_encode(name, NAME_ENCODE_SET).to_string()
}

/// Value accepted by [`FormData::append`] and [`FormData::set`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
	/// UTF-8 text part.
	Text(String),
	/// File part with explicit filename and MIME type.
	File {
		/// Payload bytes.
		bytes: Vec<u8>,
		/// Filename sent in `Content-Disposition`.
		filename: String,
		/// Part `Content-Type`.
		mime: String,
	},
	/// Local file URLs are read from disk; other URLs become text.
	Url(Url),
	/// Date rendered with the form's date strategy.
	Date(DateTime<Utc>),
}

impl FormValue {
	/// Binary payload with the default filename and `application/octet-stream`.
	pub fn blob(bytes: Vec<u8>) -> Self {
		Self::file(bytes, DEFAULT_BLOB_FILENAME, OCTET_STREAM)
	}

	/// Binary payload with an explicit filename and MIME type.
	pub fn file(bytes: Vec<u8>, filename: impl Into<String>, mime: impl Into<String>) -> Self {
		Self::File {
			bytes,
			filename: filename.into(),
			mime: mime.into(),
		}
	}
}

impl From<&str> for FormValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<String> for FormValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for FormValue {
	fn from(value: bool) -> Self {
		Self::Text(value.to_string())
	}
}

macro_rules! numeric_form_value {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for FormValue {
				fn from(value: $ty) -> Self {
					Self::Text(value.decimal_text())
				}
			}
		)*
	};
}

numeric_form_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, Decimal);

impl From<Vec<u8>> for FormValue {
	fn from(value: Vec<u8>) -> Self {
		Self::blob(value)
	}
}

impl From<Blob> for FormValue {
	fn from(value: Blob) -> Self {
		Self::blob(value.0)
	}
}

impl From<Url> for FormValue {
	fn from(value: Url) -> Self {
		Self::Url(value)
	}
}

impl From<DateTime<Utc>> for FormValue {
	fn from(value: DateTime<Utc>) -> Self {
		Self::Date(value)
	}
}

impl From<Scalar> for FormValue {
	fn from(value: Scalar) -> Self {
		match value {
			Scalar::String(v) | Scalar::Number(v) => Self::Text(v),
			Scalar::Bool(v) => v.into(),
			Scalar::Url(v) => Self::Url(v),
			Scalar::Blob(v) => Self::blob(v),
			Scalar::Date(v) => Self::Date(v),
		}
	}
}

/// One stored part, in the order it will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDataItem {
	name: String,
	value: Vec<u8>,
	filename: Option<String>,
	mime: Option<String>,
}

impl FormDataItem {
	fn text(name: String, value: String) -> Self {
		Self {
			name,
			value: value.into_bytes(),
			filename: None,
			mime: None,
		}
	}

	fn file(name: String, value: Vec<u8>, filename: String, mime: String) -> Self {
		Self {
			name,
			value,
			filename: Some(filename),
			mime: Some(mime),
		}
	}

	/// Percent-encoded field name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Raw payload bytes.
	pub fn value(&self) -> &[u8] {
		&self.value
	}

	/// Filename for file parts.
	pub fn filename(&self) -> Option<&str> {
		self.filename.as_deref()
	}

	/// MIME type for file parts.
	pub fn mime(&self) -> Option<&str> {
		self.mime.as_deref()
	}

	/// Whether the part is written with a filename.
	pub fn is_file(&self) -> bool {
		self.filename.is_some()
	}
}

/// Read view of a stored part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
	/// Text part.
	Text(&'a str),
	/// File part payload.
	Blob(&'a [u8]),
}

impl<'a> FieldValue<'a> {
	/// View `item`; text parts that are not valid UTF-8 have no view.
	pub fn from_item(item: &'a FormDataItem) -> Option<Self> {
		if item.is_file() {
			return Some(Self::Blob(&item.value));
		}
		std::str::from_utf8(&item.value).ok().map(Self::Text)
	}

	/// Text content, if this is a text part.
	pub fn as_text(&self) -> Option<&'a str> {
		match *self {
			Self::Text(text) => Some(text),
			Self::Blob(_) => None,
		}
	}
}

/// Ordered multipart field store.
///
/// Names are percent-encoded on the way in; lookups encode the queried name
/// the same way, so callers always use the plain name.
#[derive(Clone)]
pub struct FormData {
	items: Vec<FormDataItem>,
	boundary: String,
	mime_detector: Arc<dyn MimeDetector>,
	/// Strategy used when dates are appended.
	pub date_strategy: DateStrategy,
}

impl fmt::Debug for FormData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormData")
			.field("items", &self.items)
			.field("boundary", &self.boundary)
			.field("date_strategy", &self.date_strategy)
			.finish_non_exhaustive()
	}
}

impl Default for FormData {
	fn default() -> Self {
		Self::new()
	}
}

impl FormData {
	/// Empty form with a fresh random boundary.
	pub fn new() -> Self {
		Self::with_boundary(multipart::generate_boundary())
	}

	/// Empty form with a caller-chosen boundary.
	pub fn with_boundary(boundary: impl Into<String>) -> Self {
		Self {
			items: Vec::new(),
			boundary: boundary.into(),
			mime_detector: Arc::new(GuessMime),
			date_strategy: DateStrategy::default(),
		}
	}

	/// Replace the detector consulted for local file URLs.
	pub fn with_mime_detector(mut self, detector: impl MimeDetector + 'static) -> Self {
		self.mime_detector = Arc::new(detector);
		self
	}

	/// Boundary delimiting parts in the body.
	pub fn boundary(&self) -> &str {
		&self.boundary
	}

	/// Stored parts in write order.
	pub fn items(&self) -> &[FormDataItem] {
		&self.items
	}

	/// Number of stored parts.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether no part is stored.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Append a part; earlier parts with the same name are kept.
	pub fn append(&mut self, name: &str, value: impl Into<FormValue>) {
		let name = encode_name(name);
		match value.into() {
			FormValue::Text(text) => self.items.push(FormDataItem::text(name, text)),
			FormValue::File { bytes, filename, mime } => self.items.push(FormDataItem::file(name, bytes, filename, mime)),
			FormValue::Url(url) => self.append_url(name, url),
			FormValue::Date(date) => {
				let text = self.date_strategy.render(&date);
				self.items.push(FormDataItem::text(name, text));
			}
		}
	}

	/// Append raw bytes: UTF-8 becomes text, anything else a blob named
	/// [`DEFAULT_BLOB_FILENAME`].
	pub fn append_raw(&mut self, name: &str, bytes: Vec<u8>) {
		match String::from_utf8(bytes) {
			Ok(text) => self.append(name, text),
			Err(err) => {
				debug!(field = name, "non-UTF-8 text payload stored as blob");
				self.append(name, FormValue::blob(err.into_bytes()));
			}
		}
	}

	/// Remove every part named `name`, then append `value`.
	pub fn set(&mut self, name: &str, value: impl Into<FormValue>) {
		self.delete(name);
		self.append(name, value);
	}

	/// Remove every part named `name`.
	pub fn delete(&mut self, name: &str) {
		let name = encode_name(name);
		self.items.retain(|item| item.name != name);
	}

	/// Whether any part is named `name`.
	pub fn has(&self, name: &str) -> bool {
		let name = encode_name(name);
		self.items.iter().any(|item| item.name == name)
	}

	/// First part named `name`.
	pub fn get(&self, name: &str) -> Option<FieldValue<'_>> {
		let name = encode_name(name);
		self.items.iter().find(|item| item.name == name).and_then(FieldValue::from_item)
	}

	/// Every part named `name`, in insertion order.
	pub fn get_all(&self, name: &str) -> Vec<FieldValue<'_>> {
		let name = encode_name(name);
		self.items.iter().filter(|item| item.name == name).filter_map(FieldValue::from_item).collect()
	}

	/// Distinct stored names in first-seen order.
	pub fn keys(&self) -> Keys<'_> {
		Keys {
			items: self.items.iter(),
			seen: HashSet::new(),
		}
	}

	/// `(name, value)` pairs in insertion order.
	pub fn entries(&self) -> Entries<'_> {
		Entries { items: self.items.iter() }
	}

	/// Values in insertion order.
	pub fn values(&self) -> Values<'_> {
		Values { items: self.items.iter() }
	}

	/// Complete multipart body for the stored parts.
	pub fn body_for_http_request(&self) -> Vec<u8> {
		multipart::write_body(&self.boundary, &self.items)
	}

	/// `Content-Type` header value announcing this form's boundary.
	pub fn content_type_for_http_request(&self) -> String {
		multipart::content_type(&self.boundary)
	}

	fn append_url(&mut self, name: String, url: Url) {
		if url.scheme() != "file" {
			self.items.push(FormDataItem::text(name, url.to_string()));
			return;
		}
		let Ok(path) = url.to_file_path() else {
			debug!(field = %name, url = %url, "dropping file field: not a local path");
			return;
		};
		let Some(mime) = self.mime_detector.detect(&path) else {
			debug!(field = %name, url = %url, "dropping file field: no mime type");
			return;
		};
		let bytes = match fs::read(&path) {
			Ok(bytes) => bytes,
			Err(err) => {
				debug!(field = %name, url = %url, error = %err, "dropping file field: unreadable");
				return;
			}
		};
		let filename = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
		self.items.push(FormDataItem::file(name, bytes, filename, mime));
	}
}

/// Iterator over distinct field names, see [`FormData::keys`].
#[derive(Debug)]
pub struct Keys<'a> {
	items: slice::Iter<'a, FormDataItem>,
	seen: HashSet<&'a str>,
}

impl<'a> Iterator for Keys<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.items.by_ref().map(FormDataItem::name).find(|name| self.seen.insert(*name))
	}
}

/// Iterator over `(name, value)` pairs, see [`FormData::entries`].
#[derive(Debug)]
pub struct Entries<'a> {
	items: slice::Iter<'a, FormDataItem>,
}

impl<'a> Iterator for Entries<'a> {
	type Item = (&'a str, FieldValue<'a>);

	fn next(&mut self) -> Option<Self::Item> {
		self.items.by_ref().find_map(|item| FieldValue::from_item(item).map(|value| (item.name(), value)))
	}
}

/// Iterator over values, see [`FormData::values`].
#[derive(Debug)]
pub struct Values<'a> {
	items: slice::Iter<'a, FormDataItem>,
}

impl<'a> Iterator for Values<'a> {
	type Item = FieldValue<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		self.items.by_ref().find_map(FieldValue::from_item)
	}
}

#[cfg(test)]
mod tests;
