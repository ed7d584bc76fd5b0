use std::fmt;

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Named object member.
	Field(String),
	/// Zero-based array position.
	Index(usize),
}

/// Ordered field path; renders as `a.b[0].c`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
	/// Ordered sequence of path steps.
	pub steps: Vec<PathStep>,
}

impl FieldPath {
	/// Empty path addressing the root value.
	pub fn root() -> Self {
		Self::default()
	}

	/// Whether this path addresses the root.
	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	/// Copy of this path extended by a member name.
	pub fn child_field(&self, name: &str) -> Self {
		let mut steps = self.steps.clone();
		steps.push(PathStep::Field(name.to_owned()));
		Self { steps }
	}

	/// Copy of this path extended by an array position.
	pub fn child_index(&self, index: usize) -> Self {
		let mut steps = self.steps.clone();
		steps.push(PathStep::Index(index));
		Self { steps }
	}

	/// Whether `prefix` addresses this path or one of its ancestors.
	pub fn starts_with(&self, prefix: &FieldPath) -> bool {
		self.steps.starts_with(&prefix.steps)
	}

	/// Parse dotted member syntax with optional `[index]` selectors.
	///
	/// Member names may hold any character except `.`, `[` and `]`.
	pub fn parse(input: &str) -> Option<Self> {
		if input.is_empty() {
			return None;
		}

		let bytes = input.as_bytes();
		let mut idx = 0_usize;
		let mut steps = Vec::new();

		while idx < bytes.len() {
			let start = idx;
			while idx < bytes.len() && !matches!(bytes[idx], b'.' | b'[' | b']') {
				idx += 1;
			}
			if idx == start {
				return None;
			}
			steps.push(PathStep::Field(input[start..idx].to_owned()));

			while idx < bytes.len() && bytes[idx] == b'[' {
				idx += 1;
				let n_start = idx;
				while idx < bytes.len() && bytes[idx].is_ascii_digit() {
					idx += 1;
				}
				if idx == n_start || idx >= bytes.len() || bytes[idx] != b']' {
					return None;
				}
				steps.push(PathStep::Index(input[n_start..idx].parse().ok()?));
				idx += 1;
			}

			if idx < bytes.len() {
				if bytes[idx] != b'.' {
					return None;
				}
				idx += 1;
				if idx >= bytes.len() {
					return None;
				}
			}
		}

		Some(Self { steps })
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (pos, step) in self.steps.iter().enumerate() {
			match step {
				PathStep::Field(name) if pos == 0 => f.write_str(name)?,
				PathStep::Field(name) => write!(f, ".{name}")?,
				PathStep::Index(index) => write!(f, "[{index}]")?,
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::{FieldPath, PathStep};

	#[test]
	fn renders_members_and_indices() {
		let path = FieldPath::root().child_field("user").child_field("tags").child_index(2).child_index(0);
		assert_eq!(path.to_string(), "user.tags[2][0]");
		assert_eq!(FieldPath::root().to_string(), "");
	}

	#[test]
	fn parse_accepts_rendered_paths() {
		let path = FieldPath::parse("address.lines[1].first name").expect("path parses");
		assert_eq!(
			path.steps,
			vec![
				PathStep::Field("address".into()),
				PathStep::Field("lines".into()),
				PathStep::Index(1),
				PathStep::Field("first name".into()),
			]
		);
		assert_eq!(path.to_string(), "address.lines[1].first name");
	}

	#[test]
	fn parse_rejects_malformed_paths() {
		for input in ["", ".a", "a.", "a[", "a[x]", "a]b", "[0]"] {
			assert!(FieldPath::parse(input).is_none(), "{input:?} should be rejected");
		}
	}

	#[test]
	fn prefix_matching_follows_steps() {
		let path = FieldPath::parse("address.city").expect("path parses");
		let prefix = FieldPath::parse("address").expect("prefix parses");
		assert!(path.starts_with(&prefix));
		assert!(!prefix.starts_with(&path));
		assert!(path.starts_with(&FieldPath::root()));
	}
}
