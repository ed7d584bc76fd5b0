use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use url::Url;

use crate::form::{EncodedValue, Encodable, Encoder, Result};

/// Numbers rendered as canonical decimal text (no locale, no separators).
pub trait Numeric {
	/// Canonical decimal text.
	fn decimal_text(&self) -> String;
}

macro_rules! numeric_display {
	($($ty:ty),* $(,)?) => {
		$(
			impl Numeric for $ty {
				fn decimal_text(&self) -> String {
					self.to_string()
				}
			}

			impl Encodable for $ty {
				fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
					encoder.single_value_container()?.encode_number(self);
					Ok(())
				}
			}
		)*
	};
}

// `Display` for floats is the shortest text that round-trips; `Decimal` keeps its exact digits.
numeric_display!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, Decimal);

/// Binary payload encoded verbatim as a blob leaf.
///
/// `Vec<u8>` on its own encodes as an array of numbers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
	fn from(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}
}

impl Encodable for Blob {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.single_value_container()?.encode_blob(self.0.clone());
		Ok(())
	}
}

impl Encodable for DateTime<Utc> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.single_value_container()?.encode_date(*self)
	}
}

impl Encodable for Url {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.single_value_container()?.encode_url(self.clone());
		Ok(())
	}
}

impl Encodable for EncodedValue {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.single_value_container()?.encode_value(self.clone());
		Ok(())
	}
}

impl Encodable for str {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.single_value_container()?.encode_str(self);
		Ok(())
	}
}

impl Encodable for String {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		self.as_str().encode(encoder)
	}
}

impl Encodable for char {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.single_value_container()?.encode_str(self.encode_utf8(&mut [0_u8; 4]));
		Ok(())
	}
}

impl Encodable for bool {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.single_value_container()?.encode_bool(*self);
		Ok(())
	}
}

impl Encodable for () {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encoder.single_value_container()?.encode_null();
		Ok(())
	}
}

impl<T: Encodable> Encodable for Option<T> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		match self {
			Some(value) => value.encode(encoder),
			None => {
				encoder.single_value_container()?.encode_null();
				Ok(())
			}
		}
	}
}

impl<T: Encodable + ?Sized> Encodable for &T {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		(**self).encode(encoder)
	}
}

impl<T: Encodable + ?Sized> Encodable for Box<T> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		(**self).encode(encoder)
	}
}

impl<T: Encodable + ?Sized> Encodable for Rc<T> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		(**self).encode(encoder)
	}
}

impl<T: Encodable + ?Sized> Encodable for Arc<T> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		(**self).encode(encoder)
	}
}

fn encode_seq<'a, T: Encodable + 'a>(items: impl IntoIterator<Item = &'a T>, encoder: &mut Encoder<'_>) -> Result<()> {
	let mut container = encoder.indexed_container()?;
	for item in items {
		container.encode(item)?;
	}
	Ok(())
}

impl<T: Encodable> Encodable for [T] {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encode_seq(self, encoder)
	}
}

impl<T: Encodable, const N: usize> Encodable for [T; N] {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encode_seq(self, encoder)
	}
}

impl<T: Encodable> Encodable for Vec<T> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encode_seq(self, encoder)
	}
}

impl<T: Encodable> Encodable for VecDeque<T> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encode_seq(self, encoder)
	}
}

fn encode_map<'a, K: AsRef<str> + 'a, V: Encodable + 'a>(entries: impl IntoIterator<Item = (&'a K, &'a V)>, encoder: &mut Encoder<'_>) -> Result<()> {
	let mut container = encoder.keyed_container()?;
	for (key, value) in entries {
		container.encode(key.as_ref(), value)?;
	}
	Ok(())
}

impl<K: AsRef<str>, V: Encodable> Encodable for BTreeMap<K, V> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encode_map(self, encoder)
	}
}

impl<K: AsRef<str>, V: Encodable, S: BuildHasher> Encodable for HashMap<K, V, S> {
	fn encode(&self, encoder: &mut Encoder<'_>) -> Result<()> {
		encode_map(self, encoder)
	}
}
