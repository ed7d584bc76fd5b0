use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::ser::{self, Impossible, Serialize, Serializer};
use url::Url;

use crate::form::encoder::render_path;
use crate::form::with::{DATE_TOKEN, DECIMAL_TOKEN, URL_TOKEN};
use crate::form::{Encodable, Encoder, FieldPath, FormError, Result};

/// Adapter encoding any `serde::Serialize` value.
///
/// Structs and maps become keyed containers, sequences and tuples indexed
/// containers, byte strings blobs, `None` and unit the `"null"` placeholder,
/// and enum variants carrying data single-member objects named after the
/// variant. Fields tagged with the [`with`](crate::form::with) helpers keep
/// their date, URL or number kind.
#[derive(Debug)]
pub struct Serde<'a, T: ?Sized>(pub &'a T);

impl<T: Serialize + ?Sized> Encodable for Serde<'_, T> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		self.0.serialize(&mut *encoder)
	}
}

macro_rules! serialize_numbers {
	($($method:ident: $ty:ty),* $(,)?) => {
		$(
			fn $method(self, v: $ty) -> Result<()> {
				self.single_value_container()?.encode_number(&v);
				Ok(())
			}
		)*
	};
}

impl<'s, 'o> Serializer for &'s mut Encoder<'o> {
	type Ok = ();
	type Error = FormError;
	type SerializeSeq = Compound<'s, 'o>;
	type SerializeTuple = Compound<'s, 'o>;
	type SerializeTupleStruct = Compound<'s, 'o>;
	type SerializeTupleVariant = VariantCompound<'s, 'o>;
	type SerializeMap = Compound<'s, 'o>;
	type SerializeStruct = Compound<'s, 'o>;
	type SerializeStructVariant = VariantCompound<'s, 'o>;

	serialize_numbers!(
		serialize_i8: i8,
		serialize_i16: i16,
		serialize_i32: i32,
		serialize_i64: i64,
		serialize_i128: i128,
		serialize_u8: u8,
		serialize_u16: u16,
		serialize_u32: u32,
		serialize_u64: u64,
		serialize_u128: u128,
		serialize_f32: f32,
		serialize_f64: f64,
	);

	fn serialize_bool(self, v: bool) -> Result<()> {
		self.single_value_container()?.encode_bool(v);
		Ok(())
	}

	fn serialize_char(self, v: char) -> Result<()> {
		self.single_value_container()?.encode_str(v.encode_utf8(&mut [0_u8; 4]));
		Ok(())
	}

	fn serialize_str(self, v: &str) -> Result<()> {
		self.single_value_container()?.encode_str(v);
		Ok(())
	}

	fn serialize_bytes(self, v: &[u8]) -> Result<()> {
		self.single_value_container()?.encode_blob(v.to_vec());
		Ok(())
	}

	fn serialize_none(self) -> Result<()> {
		self.serialize_unit()
	}

	fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<()> {
		self.single_value_container()?.encode_null();
		Ok(())
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
		self.serialize_unit()
	}

	fn serialize_unit_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str) -> Result<()> {
		self.serialize_str(variant)
	}

	fn serialize_newtype_struct<T: ?Sized + Serialize>(self, name: &'static str, value: &T) -> Result<()> {
		match name {
			DATE_TOKEN => {
				let text = marker_text(self, value)?;
				let date = DateTime::parse_from_rfc3339(&text).map_err(|err| malformed(&*self, "date", &text, err))?;
				self.single_value_container()?.encode_date(date.with_timezone(&Utc))
			}
			URL_TOKEN => {
				let text = marker_text(self, value)?;
				let url = Url::parse(&text).map_err(|err| malformed(&*self, "url", &text, err))?;
				self.single_value_container()?.encode_url(url);
				Ok(())
			}
			DECIMAL_TOKEN => {
				let text = marker_text(self, value)?;
				let number = text.parse::<Decimal>().map_err(|err| malformed(&*self, "decimal", &text, err))?;
				self.single_value_container()?.encode_number(&number);
				Ok(())
			}
			_ => value.serialize(self),
		}
	}

	fn serialize_newtype_variant<T: ?Sized + Serialize>(self, _name: &'static str, _variant_index: u32, variant: &'static str, value: &T) -> Result<()> {
		self.keyed_container()?.encode(variant, &Serde(value))
	}

	fn serialize_seq(self, _len: Option<usize>) -> Result<Compound<'s, 'o>> {
		self.indexed_container()?;
		Ok(Compound { encoder: self, key: None })
	}

	fn serialize_tuple(self, len: usize) -> Result<Compound<'s, 'o>> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<Compound<'s, 'o>> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str, _len: usize) -> Result<VariantCompound<'s, 'o>> {
		let mut session = Encoder::at(self.options(), self.coding_path().child_field(variant));
		session.indexed_container()?;
		Ok(VariantCompound {
			parent: self,
			variant,
			session,
		})
	}

	fn serialize_map(self, _len: Option<usize>) -> Result<Compound<'s, 'o>> {
		self.keyed_container()?;
		Ok(Compound { encoder: self, key: None })
	}

	fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Compound<'s, 'o>> {
		self.serialize_map(Some(len))
	}

	fn serialize_struct_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str, _len: usize) -> Result<VariantCompound<'s, 'o>> {
		let mut session = Encoder::at(self.options(), self.coding_path().child_field(variant));
		session.keyed_container()?;
		Ok(VariantCompound {
			parent: self,
			variant,
			session,
		})
	}
}

/// In-progress sequence, map or struct written straight into its session.
#[derive(Debug)]
pub struct Compound<'s, 'o> {
	encoder: &'s mut Encoder<'o>,
	key: Option<String>,
}

impl Compound<'_, '_> {
	fn element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		self.encoder.indexed_container()?.encode(&Serde(value))
	}

	fn member<T: ?Sized + Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
		self.encoder.keyed_container()?.encode(key, &Serde(value))
	}
}

impl ser::SerializeSeq for Compound<'_, '_> {
	type Ok = ();
	type Error = FormError;

	fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		self.element(value)
	}

	fn end(self) -> Result<()> {
		Ok(())
	}
}

impl ser::SerializeTuple for Compound<'_, '_> {
	type Ok = ();
	type Error = FormError;

	fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		self.element(value)
	}

	fn end(self) -> Result<()> {
		Ok(())
	}
}

impl ser::SerializeTupleStruct for Compound<'_, '_> {
	type Ok = ();
	type Error = FormError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		self.element(value)
	}

	fn end(self) -> Result<()> {
		Ok(())
	}
}

impl ser::SerializeMap for Compound<'_, '_> {
	type Ok = ();
	type Error = FormError;

	fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
		let path = self.encoder.coding_path();
		self.key = Some(key.serialize(MapKeySerializer { path })?);
		Ok(())
	}

	fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		let key = self
			.key
			.take()
			.ok_or_else(|| FormError::Custom("map value serialized before its key".to_owned()))?;
		self.member(&key, value)
	}

	fn end(self) -> Result<()> {
		Ok(())
	}
}

impl ser::SerializeStruct for Compound<'_, '_> {
	type Ok = ();
	type Error = FormError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
		self.member(key, value)
	}

	fn end(self) -> Result<()> {
		Ok(())
	}
}

/// In-progress enum variant, built in its own session and stored under the
/// variant name on completion.
#[derive(Debug)]
pub struct VariantCompound<'s, 'o> {
	parent: &'s mut Encoder<'o>,
	variant: &'static str,
	session: Encoder<'o>,
}

impl VariantCompound<'_, '_> {
	fn finish(self) -> Result<()> {
		let Self { parent, variant, session } = self;
		parent.keyed_container()?.encode_value(variant, session.finish());
		Ok(())
	}
}

impl ser::SerializeTupleVariant for VariantCompound<'_, '_> {
	type Ok = ();
	type Error = FormError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
		self.session.indexed_container()?.encode(&Serde(value))
	}

	fn end(self) -> Result<()> {
		self.finish()
	}
}

impl ser::SerializeStructVariant for VariantCompound<'_, '_> {
	type Ok = ();
	type Error = FormError;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
		self.session.keyed_container()?.encode(key, &Serde(value))
	}

	fn end(self) -> Result<()> {
		self.finish()
	}
}

// Text carried inside a typed-field marker.
fn marker_text<T: ?Sized + Serialize>(encoder: &Encoder<'_>, value: &T) -> Result<String> {
	value.serialize(MapKeySerializer { path: encoder.coding_path() })
}

fn malformed(encoder: &Encoder<'_>, what: &str, text: &str, err: impl fmt::Display) -> FormError {
	FormError::UnsupportedEncodable {
		path: render_path(encoder.coding_path()),
		reason: format!("invalid {what} {text:?}: {err}"),
	}
}

// Map keys must be text-convertible scalars.
struct MapKeySerializer<'p> {
	path: &'p FieldPath,
}

impl MapKeySerializer<'_> {
	fn reject(&self, got: &str) -> FormError {
		FormError::UnsupportedEncodable {
			path: render_path(self.path),
			reason: format!("map key must be text-convertible, got {got}"),
		}
	}
}

macro_rules! key_to_string {
	($($method:ident: $ty:ty),* $(,)?) => {
		$(
			fn $method(self, v: $ty) -> Result<String> {
				Ok(v.to_string())
			}
		)*
	};
}

impl Serializer for MapKeySerializer<'_> {
	type Ok = String;
	type Error = FormError;
	type SerializeSeq = Impossible<String, FormError>;
	type SerializeTuple = Impossible<String, FormError>;
	type SerializeTupleStruct = Impossible<String, FormError>;
	type SerializeTupleVariant = Impossible<String, FormError>;
	type SerializeMap = Impossible<String, FormError>;
	type SerializeStruct = Impossible<String, FormError>;
	type SerializeStructVariant = Impossible<String, FormError>;

	key_to_string!(
		serialize_bool: bool,
		serialize_i8: i8,
		serialize_i16: i16,
		serialize_i32: i32,
		serialize_i64: i64,
		serialize_i128: i128,
		serialize_u8: u8,
		serialize_u16: u16,
		serialize_u32: u32,
		serialize_u64: u64,
		serialize_u128: u128,
		serialize_f32: f32,
		serialize_f64: f64,
		serialize_char: char,
	);

	fn serialize_str(self, v: &str) -> Result<String> {
		Ok(v.to_owned())
	}

	fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
		Err(self.reject("bytes"))
	}

	fn serialize_none(self) -> Result<String> {
		Err(self.reject("none"))
	}

	fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String> {
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<String> {
		Err(self.reject("unit"))
	}

	fn serialize_unit_struct(self, name: &'static str) -> Result<String> {
		Err(self.reject(name))
	}

	fn serialize_unit_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str) -> Result<String> {
		Ok(variant.to_owned())
	}

	fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<String> {
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: ?Sized + Serialize>(self, _name: &'static str, _variant_index: u32, variant: &'static str, _value: &T) -> Result<String> {
		Err(self.reject(variant))
	}

	fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
		Err(self.reject("sequence"))
	}

	fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
		Err(self.reject("tuple"))
	}

	fn serialize_tuple_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct> {
		Err(self.reject(name))
	}

	fn serialize_tuple_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str, _len: usize) -> Result<Self::SerializeTupleVariant> {
		Err(self.reject(variant))
	}

	fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
		Err(self.reject("map"))
	}

	fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
		Err(self.reject(name))
	}

	fn serialize_struct_variant(self, _name: &'static str, _variant_index: u32, variant: &'static str, _len: usize) -> Result<Self::SerializeStructVariant> {
		Err(self.reject(variant))
	}
}
