use chrono::{DateTime, Utc};
use url::Url;

use crate::form::builder::{ArrayBuilder, NULL_TEXT, ObjectBuilder, TreeBuilder};
use crate::form::date::natural_text;
use crate::form::flatten::write_form;
use crate::form::impls::Numeric;
use crate::form::{ContainerKind, DateStrategy, EncodedValue, FieldPath, FormData, FormError, Result};

/// Behavior switches for one encoding session.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
	/// Strategy applied to date leaves.
	pub date_strategy: DateStrategy,
}

impl EncodeOptions {
	/// Preset for typical HTML-form backends: ISO 8601 dates.
	pub fn for_web_forms() -> Self {
		Self {
			date_strategy: DateStrategy::Iso8601,
		}
	}
}

/// A value that can describe itself to an [`Encoder`] session.
pub trait Encodable {
	/// Write this value into `encoder`, selecting exactly one root container.
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()>;
}

/// One encoding session owning a single tree root.
///
/// The first container request fixes the root shape; asking again for the
/// same shape reuses it, asking for a different one fails with
/// [`FormError::ContainerConflict`].
#[derive(Debug)]
pub struct Encoder<'o> {
	options: &'o EncodeOptions,
	coding_path: FieldPath,
	root: Option<TreeBuilder>,
}

impl<'o> Encoder<'o> {
	/// Start a root session.
	pub fn new(options: &'o EncodeOptions) -> Self {
		Self::at(options, FieldPath::root())
	}

	pub(crate) fn at(options: &'o EncodeOptions, coding_path: FieldPath) -> Self {
		Self {
			options,
			coding_path,
			root: None,
		}
	}

	/// Options shared by this session and its nested sessions.
	pub fn options(&self) -> &'o EncodeOptions {
		self.options
	}

	/// Path from the outermost session to this one.
	pub fn coding_path(&self) -> &FieldPath {
		&self.coding_path
	}

	/// Root shape selected so far, if any.
	pub fn selected(&self) -> Option<ContainerKind> {
		self.root.as_ref().map(TreeBuilder::kind)
	}

	/// Select (or reuse) a keyed root.
	pub fn keyed_container(&mut self) -> Result<KeyedContainer<'_>> {
		match select(&mut self.root, &self.coding_path, ContainerKind::Keyed)? {
			TreeBuilder::Object(object) => Ok(KeyedContainer {
				object,
				options: self.options,
				path: self.coding_path.clone(),
			}),
			_ => unreachable!("keyed selection yields an object root"),
		}
	}

	/// Select (or reuse) an indexed root.
	pub fn indexed_container(&mut self) -> Result<IndexedContainer<'_>> {
		match select(&mut self.root, &self.coding_path, ContainerKind::Indexed)? {
			TreeBuilder::Array(array) => Ok(IndexedContainer {
				array,
				options: self.options,
				path: self.coding_path.clone(),
			}),
			_ => unreachable!("indexed selection yields an array root"),
		}
	}

	/// Select (or reuse) a single-value root.
	pub fn single_value_container(&mut self) -> Result<SingleValueContainer<'_>> {
		match select(&mut self.root, &self.coding_path, ContainerKind::SingleValue)? {
			TreeBuilder::Single(slot) => Ok(SingleValueContainer {
				slot,
				options: self.options,
				path: self.coding_path.clone(),
			}),
			_ => unreachable!("single-value selection yields a slot root"),
		}
	}

	/// Freeze the session root into an immutable value.
	pub fn finish(self) -> EncodedValue {
		match self.root {
			Some(root) => root.freeze(),
			None => EncodedValue::String(NULL_TEXT.to_owned()),
		}
	}
}

fn select<'r>(root: &'r mut Option<TreeBuilder>, path: &FieldPath, requested: ContainerKind) -> Result<&'r mut TreeBuilder> {
	if let Some(existing) = root.as_ref()
		&& existing.kind() != requested
	{
		return Err(FormError::ContainerConflict {
			path: render_path(path),
			selected: existing.kind(),
			requested,
		});
	}

	Ok(root.get_or_insert_with(|| match requested {
		ContainerKind::Keyed => TreeBuilder::Object(ObjectBuilder::default()),
		ContainerKind::Indexed => TreeBuilder::Array(ArrayBuilder::default()),
		ContainerKind::SingleValue => TreeBuilder::Single(None),
	}))
}

/// Render a coding path for diagnostics.
pub(crate) fn render_path(path: &FieldPath) -> String {
	if path.is_empty() { "<root>".to_owned() } else { path.to_string() }
}

// Encode `value` through a fresh nested session rooted at `path`.
fn encode_nested<T: Encodable + ?Sized>(value: &T, options: &EncodeOptions, path: FieldPath) -> Result<EncodedValue> {
	let mut session = Encoder::at(options, path);
	value.encode(&mut session)?;
	Ok(session.finish())
}

/// Writer for a keyed (object) container.
#[derive(Debug)]
pub struct KeyedContainer<'e> {
	object: &'e mut ObjectBuilder,
	options: &'e EncodeOptions,
	path: FieldPath,
}

impl KeyedContainer<'_> {
	/// Path of the object this container writes.
	pub fn coding_path(&self) -> &FieldPath {
		&self.path
	}

	/// Encode any encodable value under `key` through a nested session.
	pub fn encode<T: Encodable + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
		let value = encode_nested(value, self.options, self.path.child_field(key))?;
		self.object.set(key, value);
		Ok(())
	}

	/// Store a pre-built value under `key`.
	pub fn encode_value(&mut self, key: &str, value: EncodedValue) {
		self.object.set(key, value);
	}

	/// Store text under `key`.
	pub fn encode_str(&mut self, key: &str, value: &str) {
		self.object.set(key, EncodedValue::String(value.to_owned()));
	}

	/// Store a boolean under `key`.
	pub fn encode_bool(&mut self, key: &str, value: bool) {
		self.object.set(key, EncodedValue::Bool(value));
	}

	/// Store a number under `key` as canonical decimal text.
	pub fn encode_number<N: Numeric + ?Sized>(&mut self, key: &str, value: &N) {
		self.object.set(key, EncodedValue::Number(value.decimal_text()));
	}

	/// Store the `"null"` placeholder under `key`.
	pub fn encode_null(&mut self, key: &str) {
		self.encode_str(key, NULL_TEXT);
	}

	/// Start a nested object under `key`.
	pub fn nested_keyed(&mut self, key: &str) -> KeyedContainer<'_> {
		KeyedContainer {
			path: self.path.child_field(key),
			object: self.object.set_object(key),
			options: self.options,
		}
	}

	/// Start a nested array under `key`.
	pub fn nested_indexed(&mut self, key: &str) -> IndexedContainer<'_> {
		IndexedContainer {
			path: self.path.child_field(key),
			array: self.object.set_array(key),
			options: self.options,
		}
	}
}

/// Writer for an indexed (array) container.
#[derive(Debug)]
pub struct IndexedContainer<'e> {
	array: &'e mut ArrayBuilder,
	options: &'e EncodeOptions,
	path: FieldPath,
}

impl IndexedContainer<'_> {
	/// Path of the array this container writes.
	pub fn coding_path(&self) -> &FieldPath {
		&self.path
	}

	/// Number of elements appended so far.
	pub fn count(&self) -> usize {
		self.array.len()
	}

	/// Append any encodable value through a nested session.
	pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<()> {
		let value = encode_nested(value, self.options, self.path.child_index(self.count()))?;
		self.array.push(value);
		Ok(())
	}

	/// Append a pre-built value.
	pub fn encode_value(&mut self, value: EncodedValue) {
		self.array.push(value);
	}

	/// Append text.
	pub fn encode_str(&mut self, value: &str) {
		self.array.push(EncodedValue::String(value.to_owned()));
	}

	/// Append a boolean.
	pub fn encode_bool(&mut self, value: bool) {
		self.array.push(EncodedValue::Bool(value));
	}

	/// Append a number as canonical decimal text.
	pub fn encode_number<N: Numeric + ?Sized>(&mut self, value: &N) {
		self.array.push(EncodedValue::Number(value.decimal_text()));
	}

	/// Append the `"null"` placeholder.
	pub fn encode_null(&mut self) {
		self.encode_str(NULL_TEXT);
	}

	/// Append a nested object.
	pub fn nested_keyed(&mut self) -> KeyedContainer<'_> {
		KeyedContainer {
			path: self.path.child_index(self.array.len()),
			object: self.array.push_object(),
			options: self.options,
		}
	}

	/// Append a nested array.
	pub fn nested_indexed(&mut self) -> IndexedContainer<'_> {
		IndexedContainer {
			path: self.path.child_index(self.array.len()),
			array: self.array.push_array(),
			options: self.options,
		}
	}
}

/// Writer for a single-value root; a later write replaces an earlier one.
#[derive(Debug)]
pub struct SingleValueContainer<'e> {
	slot: &'e mut Option<EncodedValue>,
	options: &'e EncodeOptions,
	path: FieldPath,
}

impl SingleValueContainer<'_> {
	/// Path of the value this container writes.
	pub fn coding_path(&self) -> &FieldPath {
		&self.path
	}

	/// Encode any encodable value through a nested session at the same path.
	pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<()> {
		*self.slot = Some(encode_nested(value, self.options, self.path.clone())?);
		Ok(())
	}

	/// Store a pre-built value.
	pub fn encode_value(&mut self, value: EncodedValue) {
		*self.slot = Some(value);
	}

	/// Store text.
	pub fn encode_str(&mut self, value: &str) {
		self.encode_value(EncodedValue::String(value.to_owned()));
	}

	/// Store a boolean.
	pub fn encode_bool(&mut self, value: bool) {
		self.encode_value(EncodedValue::Bool(value));
	}

	/// Store a number as canonical decimal text.
	pub fn encode_number<N: Numeric + ?Sized>(&mut self, value: &N) {
		self.encode_value(EncodedValue::Number(value.decimal_text()));
	}

	/// Store the `"null"` placeholder.
	pub fn encode_null(&mut self) {
		self.encode_str(NULL_TEXT);
	}

	/// Store a binary payload verbatim.
	pub fn encode_blob(&mut self, bytes: Vec<u8>) {
		self.encode_value(EncodedValue::Blob(bytes));
	}

	/// Store a URL; file URLs are read when the form is written.
	pub fn encode_url(&mut self, url: Url) {
		self.encode_value(EncodedValue::Url(url));
	}

	/// Store a date according to the session's date strategy.
	pub fn encode_date(&mut self, date: DateTime<Utc>) -> Result<()> {
		let value = match self.options.date_strategy {
			DateStrategy::DeferredToDate => {
				let mut session = Encoder::at(self.options, self.path.clone());
				session.single_value_container()?.encode_str(&natural_text(&date));
				session.finish()
			}
			_ => EncodedValue::Date(date),
		};
		self.encode_value(value);
		Ok(())
	}
}

/// Encode `value` into an immutable tree.
pub fn encode_value<T: Encodable + ?Sized>(value: &T, options: &EncodeOptions) -> Result<EncodedValue> {
	encode_nested(value, options, FieldPath::root())
}

/// Encode `value` and flatten it into a form carrying the session's date strategy.
pub fn to_form_data<T: Encodable + ?Sized>(value: &T, options: &EncodeOptions) -> Result<FormData> {
	let tree = encode_value(value, options)?;
	let mut form = FormData::new();
	form.date_strategy = options.date_strategy.clone();
	write_form(tree, &mut form)?;
	Ok(form)
}

/// Reusable encoder that remembers the form produced by its last run.
#[derive(Debug, Default)]
pub struct FormEncoder {
	/// Options applied to every run.
	pub options: EncodeOptions,
	last: Option<FormData>,
}

impl FormEncoder {
	/// Create an encoder with explicit options.
	pub fn new(options: EncodeOptions) -> Self {
		Self { options, last: None }
	}

	/// Encode `value` into a multipart body.
	pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<Vec<u8>> {
		let form = to_form_data(value, &self.options)?;
		let body = form.body_for_http_request();
		self.last = Some(form);
		Ok(body)
	}

	/// `Content-Type` header value matching the last encoded body.
	pub fn content_type(&self) -> Option<String> {
		self.last.as_ref().map(FormData::content_type_for_http_request)
	}

	/// Form produced by the last successful run.
	pub fn form(&self) -> Option<&FormData> {
		self.last.as_ref()
	}
}
