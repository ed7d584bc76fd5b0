//! `#[serde(serialize_with = ...)]` helpers for fields that need typed leaves.
//!
//! Serde reduces dates, URLs and decimals to plain strings, so a derived
//! record passed through [`Serde`](crate::form::Serde) would lose their kind.
//! These helpers wrap the text in a marker newtype: the form encoder turns it
//! back into a date, URL or number leaf, while any other serializer sees the
//! inner string unchanged.
//!
//! ```ignore
//! #[derive(serde::Serialize)]
//! struct Profile {
//!     #[serde(with = "formwire::form::with::date")]
//!     joined: DateTime<Utc>,
//!     #[serde(with = "formwire::form::with::url::option")]
//!     avatar: Option<Url>,
//! }
//! ```

use serde::{Serialize, Serializer};

pub(crate) const DATE_TOKEN: &str = "$formwire::private::Date";
pub(crate) const URL_TOKEN: &str = "$formwire::private::Url";
pub(crate) const DECIMAL_TOKEN: &str = "$formwire::private::Decimal";

struct Tagged {
	token: &'static str,
	text: String,
}

impl Serialize for Tagged {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_newtype_struct(self.token, &self.text)
	}
}

fn tagged_option<T, S: Serializer>(value: Option<&T>, serializer: S, tag: impl FnOnce(&T) -> Tagged) -> Result<S::Ok, S::Error> {
	match value {
		Some(value) => serializer.serialize_some(&tag(value)),
		None => serializer.serialize_none(),
	}
}

/// `DateTime<Utc>` fields, rendered by the session's date strategy.
pub mod date {
	use chrono::{DateTime, Utc};
	use serde::{Serialize, Serializer};

	use super::{DATE_TOKEN, Tagged, tagged_option};
	use crate::form::date::natural_text;

	fn tag(date: &DateTime<Utc>) -> Tagged {
		Tagged {
			token: DATE_TOKEN,
			text: natural_text(date),
		}
	}

	/// Serialize a date field.
	pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
		tag(date).serialize(serializer)
	}

	/// `Option<DateTime<Utc>>` fields.
	pub mod option {
		use chrono::{DateTime, Utc};
		use serde::Serializer;

		/// Serialize an optional date field.
		pub fn serialize<S: Serializer>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
			super::tagged_option(date.as_ref(), serializer, super::tag)
		}
	}
}

/// `Url` fields; local file URLs become file parts.
pub mod url {
	use ::url::Url;
	use serde::{Serialize, Serializer};

	use super::{Tagged, URL_TOKEN, tagged_option};

	fn tag(url: &Url) -> Tagged {
		Tagged {
			token: URL_TOKEN,
			text: url.as_str().to_owned(),
		}
	}

	/// Serialize a URL field.
	pub fn serialize<S: Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
		tag(url).serialize(serializer)
	}

	/// `Option<Url>` fields.
	pub mod option {
		use ::url::Url;
		use serde::Serializer;

		/// Serialize an optional URL field.
		pub fn serialize<S: Serializer>(url: &Option<Url>, serializer: S) -> Result<S::Ok, S::Error> {
			super::tagged_option(url.as_ref(), serializer, super::tag)
		}
	}
}

/// `rust_decimal::Decimal` fields, kept as exact number leaves.
pub mod decimal {
	use rust_decimal::Decimal;
	use serde::{Serialize, Serializer};

	use super::{DECIMAL_TOKEN, Tagged, tagged_option};

	fn tag(value: &Decimal) -> Tagged {
		Tagged {
			token: DECIMAL_TOKEN,
			text: value.to_string(),
		}
	}

	/// Serialize a decimal field.
	pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
		tag(value).serialize(serializer)
	}

	/// `Option<Decimal>` fields.
	pub mod option {
		use rust_decimal::Decimal;
		use serde::Serializer;

		/// Serialize an optional decimal field.
		pub fn serialize<S: Serializer>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error> {
			super::tagged_option(value.as_ref(), serializer, super::tag)
		}
	}
}
