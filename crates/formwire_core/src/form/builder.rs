use crate::form::error::ContainerKind;
use crate::form::value::{EncodedValue, Member};

/// Placeholder text for absent values; the wire format has no null.
pub(crate) const NULL_TEXT: &str = "null";

/// Mutable name-to-node mapping under construction.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
	members: Vec<(String, Node)>,
}

/// Mutable, append-only sequence under construction.
#[derive(Debug, Default)]
pub struct ArrayBuilder {
	items: Vec<Node>,
}

#[derive(Debug)]
enum Node {
	Value(EncodedValue),
	Object(ObjectBuilder),
	Array(ArrayBuilder),
}

/// Root of one encoding session, fixed to a single container shape.
#[derive(Debug)]
pub enum TreeBuilder {
	/// Keyed root.
	Object(ObjectBuilder),
	/// Indexed root.
	Array(ArrayBuilder),
	/// Single-value root; empty until a value is written.
	Single(Option<EncodedValue>),
}

impl ObjectBuilder {
	/// Number of members written so far.
	pub fn len(&self) -> usize {
		self.members.len()
	}

	/// Whether no member was written.
	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	/// Store a finished value under `name`, replacing an earlier member in place.
	pub fn set(&mut self, name: &str, value: EncodedValue) {
		self.upsert(name, Node::Value(value));
	}

	/// Start a nested object under `name`.
	pub fn set_object(&mut self, name: &str) -> &mut ObjectBuilder {
		match self.upsert(name, Node::Object(ObjectBuilder::default())) {
			Node::Object(object) => object,
			_ => unreachable!("slot holds the object just inserted"),
		}
	}

	/// Start a nested array under `name`.
	pub fn set_array(&mut self, name: &str) -> &mut ArrayBuilder {
		match self.upsert(name, Node::Array(ArrayBuilder::default())) {
			Node::Array(array) => array,
			_ => unreachable!("slot holds the array just inserted"),
		}
	}

	fn upsert(&mut self, name: &str, node: Node) -> &mut Node {
		let idx = match self.members.iter().position(|(existing, _)| existing == name) {
			Some(idx) => {
				self.members[idx].1 = node;
				idx
			}
			None => {
				self.members.push((name.to_owned(), node));
				self.members.len() - 1
			}
		};
		&mut self.members[idx].1
	}

	/// Resolve nested builders depth-first into an immutable object.
	pub fn freeze(self) -> EncodedValue {
		EncodedValue::Object(
			self.members
				.into_iter()
				.map(|(name, node)| Member { name, value: node.freeze() })
				.collect(),
		)
	}
}

impl ArrayBuilder {
	/// Number of elements written so far.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether no element was written.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Append a finished value.
	pub fn push(&mut self, value: EncodedValue) {
		self.items.push(Node::Value(value));
	}

	/// Append a nested object.
	pub fn push_object(&mut self) -> &mut ObjectBuilder {
		self.items.push(Node::Object(ObjectBuilder::default()));
		match self.items.last_mut() {
			Some(Node::Object(object)) => object,
			_ => unreachable!("last element is the object just pushed"),
		}
	}

	/// Append a nested array.
	pub fn push_array(&mut self) -> &mut ArrayBuilder {
		self.items.push(Node::Array(ArrayBuilder::default()));
		match self.items.last_mut() {
			Some(Node::Array(array)) => array,
			_ => unreachable!("last element is the array just pushed"),
		}
	}

	/// Resolve nested builders depth-first into an immutable array.
	pub fn freeze(self) -> EncodedValue {
		EncodedValue::Array(self.items.into_iter().map(Node::freeze).collect())
	}
}

impl Node {
	fn freeze(self) -> EncodedValue {
		match self {
			Self::Value(value) => value,
			Self::Object(object) => object.freeze(),
			Self::Array(array) => array.freeze(),
		}
	}
}

impl TreeBuilder {
	/// Container shape this root was created for.
	pub fn kind(&self) -> ContainerKind {
		match self {
			Self::Object(_) => ContainerKind::Keyed,
			Self::Array(_) => ContainerKind::Indexed,
			Self::Single(_) => ContainerKind::SingleValue,
		}
	}

	/// Convert the finished root into an immutable value.
	pub fn freeze(self) -> EncodedValue {
		match self {
			Self::Object(object) => object.freeze(),
			Self::Array(array) => array.freeze(),
			Self::Single(value) => value.unwrap_or_else(|| EncodedValue::String(NULL_TEXT.to_owned())),
		}
	}
}
