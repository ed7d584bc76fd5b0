use chrono::{DateTime, Utc};
use url::Url;

/// Fully-formed encoded value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedValue {
	/// Text leaf.
	String(String),
	/// Numeric leaf, kept as canonical decimal text.
	Number(String),
	/// Boolean leaf.
	Bool(bool),
	/// URL leaf; file URLs are resolved to content when written into a form.
	Url(Url),
	/// Raw binary payload.
	Blob(Vec<u8>),
	/// Date leaf rendered by the active date strategy.
	Date(DateTime<Utc>),
	/// Ordered sequence.
	Array(Vec<EncodedValue>),
	/// Named members with unique names, in insertion order.
	Object(Vec<Member>),
}

/// One named member of an object value.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
	/// Member name.
	pub name: String,
	/// Member value.
	pub value: EncodedValue,
}

/// Leaf subset of [`EncodedValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
	/// Text leaf.
	String(String),
	/// Numeric leaf as decimal text.
	Number(String),
	/// Boolean leaf.
	Bool(bool),
	/// URL leaf.
	Url(Url),
	/// Raw binary payload.
	Blob(Vec<u8>),
	/// Date leaf.
	Date(DateTime<Utc>),
}

impl EncodedValue {
	/// Whether this value is a leaf.
	pub fn is_scalar(&self) -> bool {
		!self.is_container()
	}

	/// Whether this value is an array or object.
	pub fn is_container(&self) -> bool {
		matches!(self, Self::Array(_) | Self::Object(_))
	}

	/// Stable lowercase shape label.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::String(_) => "string",
			Self::Number(_) => "number",
			Self::Bool(_) => "bool",
			Self::Url(_) => "url",
			Self::Blob(_) => "blob",
			Self::Date(_) => "date",
			Self::Array(_) => "array",
			Self::Object(_) => "object",
		}
	}

	/// Look up an object member by name.
	pub fn member(&self, name: &str) -> Option<&EncodedValue> {
		match self {
			Self::Object(members) => members.iter().find(|member| member.name == name).map(|member| &member.value),
			_ => None,
		}
	}

	/// Convert a leaf into a [`Scalar`], handing containers back unchanged.
	pub fn into_scalar(self) -> std::result::Result<Scalar, Self> {
		match self {
			Self::String(v) => Ok(Scalar::String(v)),
			Self::Number(v) => Ok(Scalar::Number(v)),
			Self::Bool(v) => Ok(Scalar::Bool(v)),
			Self::Url(v) => Ok(Scalar::Url(v)),
			Self::Blob(v) => Ok(Scalar::Blob(v)),
			Self::Date(v) => Ok(Scalar::Date(v)),
			other => Err(other),
		}
	}
}

impl Scalar {
	/// Stable lowercase shape label.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::String(_) => "string",
			Self::Number(_) => "number",
			Self::Bool(_) => "bool",
			Self::Url(_) => "url",
			Self::Blob(_) => "blob",
			Self::Date(_) => "date",
		}
	}
}

impl From<Scalar> for EncodedValue {
	fn from(value: Scalar) -> Self {
		match value {
			Scalar::String(v) => Self::String(v),
			Scalar::Number(v) => Self::Number(v),
			Scalar::Bool(v) => Self::Bool(v),
			Scalar::Url(v) => Self::Url(v),
			Scalar::Blob(v) => Self::Blob(v),
			Scalar::Date(v) => Self::Date(v),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{EncodedValue, Member, Scalar};

	#[test]
	fn containers_are_not_scalars() {
		let object = EncodedValue::Object(Vec::new());
		let array = EncodedValue::Array(Vec::new());
		assert!(object.is_container() && !object.is_scalar());
		assert!(array.is_container() && !array.is_scalar());
		assert!(EncodedValue::Number("1".into()).is_scalar());
	}

	#[test]
	fn into_scalar_returns_containers_unchanged() {
		let array = EncodedValue::Array(vec![EncodedValue::Bool(true)]);
		let back = array.clone().into_scalar().expect_err("array is not a scalar");
		assert_eq!(back, array);

		let scalar = EncodedValue::String("x".into()).into_scalar().expect("string is a scalar");
		assert_eq!(scalar, Scalar::String("x".into()));
	}

	#[test]
	fn member_lookup_reads_object_members() {
		let value = EncodedValue::Object(vec![Member {
			name: "city".into(),
			value: EncodedValue::String("X".into()),
		}]);
		assert_eq!(value.member("city"), Some(&EncodedValue::String("X".into())));
		assert_eq!(value.member("zip"), None);
		assert_eq!(EncodedValue::Bool(false).member("city"), None);
	}
}
