use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, SecondsFormat, Utc};
use rust_decimal::Decimal;

use crate::form::{FormError, Result};

/// How date leaves are turned into field text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateStrategy {
	/// Let the date encode its own natural representation (RFC 3339 text).
	///
	/// Only meaningful inside a structured encoding session; a date appended
	/// directly to a form renders as the empty string.
	#[default]
	DeferredToDate,
	/// Seconds since the Unix epoch as exact decimal text.
	SecondsSince1970,
	/// Milliseconds since the Unix epoch as exact decimal text.
	MillisecondsSince1970,
	/// RFC 3339 internet date-time, whole seconds, `Z` suffix.
	Iso8601,
	/// Caller-supplied strftime pattern rendered at a fixed UTC offset.
	Formatted(DatePattern),
}

/// Validated chrono strftime pattern plus the offset dates are shown in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
	pattern: String,
	offset: FixedOffset,
}

impl DatePattern {
	/// Validate `pattern` against chrono's strftime syntax; dates render in UTC.
	pub fn new(pattern: impl Into<String>) -> Result<Self> {
		let pattern = pattern.into();
		if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
			return Err(FormError::DateFormat { format: pattern });
		}
		Ok(Self { pattern, offset: Utc.fix() })
	}

	/// Render dates at `offset` instead of UTC.
	pub fn with_offset(mut self, offset: FixedOffset) -> Self {
		self.offset = offset;
		self
	}

	/// Raw pattern text.
	pub fn as_str(&self) -> &str {
		&self.pattern
	}

	/// Offset applied before formatting.
	pub fn offset(&self) -> FixedOffset {
		self.offset
	}

	fn render(&self, date: &DateTime<Utc>) -> String {
		date.with_timezone(&self.offset).format(&self.pattern).to_string()
	}
}

impl DateStrategy {
	/// Build a [`DateStrategy::Formatted`] from a strftime pattern.
	pub fn formatted(pattern: impl Into<String>) -> Result<Self> {
		DatePattern::new(pattern).map(Self::Formatted)
	}

	/// Render a date leaf as field text.
	pub fn render(&self, date: &DateTime<Utc>) -> String {
		match self {
			Self::DeferredToDate => String::new(),
			Self::SecondsSince1970 => epoch_text(date, 9),
			Self::MillisecondsSince1970 => epoch_text(date, 6),
			Self::Iso8601 => date.to_rfc3339_opts(SecondsFormat::Secs, true),
			Self::Formatted(pattern) => pattern.render(date),
		}
	}
}

/// Natural representation used by [`DateStrategy::DeferredToDate`].
pub(crate) fn natural_text(date: &DateTime<Utc>) -> String {
	date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

// Nanoseconds since the epoch scaled down by `scale` decimal digits.
fn epoch_text(date: &DateTime<Utc>, scale: u32) -> String {
	let nanos = i128::from(date.timestamp()) * 1_000_000_000 + i128::from(date.timestamp_subsec_nanos());
	match Decimal::try_from_i128_with_scale(nanos, scale) {
		Ok(value) => value.normalize().to_string(),
		Err(_) => date.timestamp().to_string(),
	}
}

impl fmt::Display for DateStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::DeferredToDate => f.write_str("deferred"),
			Self::SecondsSince1970 => f.write_str("seconds"),
			Self::MillisecondsSince1970 => f.write_str("milliseconds"),
			Self::Iso8601 => f.write_str("iso8601"),
			Self::Formatted(pattern) => write!(f, "formatted:{}", pattern.as_str()),
		}
	}
}

impl FromStr for DateStrategy {
	type Err = FormError;

	/// Parse `deferred`, `seconds`, `milliseconds`, `iso8601` or `formatted:<pattern>`.
	fn from_str(input: &str) -> Result<Self> {
		if let Some(pattern) = input.strip_prefix("formatted:") {
			return Self::formatted(pattern);
		}
		match input {
			"deferred" => Ok(Self::DeferredToDate),
			"seconds" => Ok(Self::SecondsSince1970),
			"milliseconds" => Ok(Self::MillisecondsSince1970),
			"iso8601" => Ok(Self::Iso8601),
			_ => Err(FormError::DateFormat { format: input.to_owned() }),
		}
	}
}
