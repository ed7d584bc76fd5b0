use std::fmt;

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, FormError>;

/// Top-level container shape chosen by an encoding session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
	/// Name-to-value container (object root).
	Keyed,
	/// Ordered, append-only container (array root).
	Indexed,
	/// One scalar or pre-built value.
	SingleValue,
}

impl ContainerKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Keyed => "keyed",
			Self::Indexed => "indexed",
			Self::SingleValue => "single_value",
		}
	}
}

impl fmt::Display for ContainerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Errors produced while encoding values and building multipart bodies.
#[derive(Debug, Error)]
pub enum FormError {
	/// A session asked for a second, different top-level container.
	#[error("container conflict at {path}: {selected} container already selected, {requested} requested")]
	ContainerConflict {
		/// Rendered coding path of the session.
		path: String,
		/// Container kind fixed by the first request.
		selected: ContainerKind,
		/// Container kind requested afterwards.
		requested: ContainerKind,
	},
	/// Flattening reached a scalar or array without an enclosing object.
	#[error("root element should be an object, got {kind}")]
	RootNotObject {
		/// Shape label of the offending root value.
		kind: &'static str,
	},
	/// Value structure cannot be mapped to any encoded shape.
	#[error("unsupported encodable at {path}: {reason}")]
	UnsupportedEncodable {
		/// Rendered coding path of the value.
		path: String,
		/// Human-readable cause.
		reason: String,
	},
	/// Custom date pattern could not be rendered.
	#[error("invalid date format pattern: {format}")]
	DateFormat {
		/// Offending strftime pattern.
		format: String,
	},
	/// Error raised by a `serde::Serialize` implementation.
	#[error("{0}")]
	Custom(String),
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
}

impl serde::ser::Error for FormError {
	fn custom<T: fmt::Display>(msg: T) -> Self {
		Self::Custom(msg.to_string())
	}
}
