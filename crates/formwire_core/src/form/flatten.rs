use tracing::trace;

use crate::form::{EncodedValue, FieldPath, FormData, FormError, Result, Scalar};

/// One named leaf of a flattened value tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatField {
	/// Dotted member path with bracketed array indices, e.g. `tags[0]`.
	pub path: String,
	/// Leaf value.
	pub value: Scalar,
}

/// Flatten an object tree into path-keyed leaves, depth-first, members in
/// insertion order.
///
/// The root must be an object; arrays and scalars have no name to hang
/// their fields on.
pub fn flatten(value: EncodedValue) -> Result<Vec<FlatField>> {
	let EncodedValue::Object(members) = value else {
		return Err(FormError::RootNotObject { kind: value.kind() });
	};

	let mut out = Vec::new();
	let root = FieldPath::root();
	for member in members {
		flatten_into(member.value, root.child_field(&member.name), &mut out);
	}
	trace!(fields = out.len(), "flattened value tree");
	Ok(out)
}

fn flatten_into(value: EncodedValue, path: FieldPath, out: &mut Vec<FlatField>) {
	match value.into_scalar() {
		Ok(scalar) => out.push(FlatField {
			path: path.to_string(),
			value: scalar,
		}),
		Err(EncodedValue::Object(members)) => {
			for member in members {
				flatten_into(member.value, path.child_field(&member.name), out);
			}
		}
		Err(EncodedValue::Array(items)) => {
			for (index, item) in items.into_iter().enumerate() {
				flatten_into(item, path.child_index(index), out);
			}
		}
		Err(_) => {}
	}
}

/// Flatten `value` and append every leaf to `form`, rendering dates with the
/// form's own strategy.
pub fn write_form(value: EncodedValue, form: &mut FormData) -> Result<()> {
	for field in flatten(value)? {
		form.append(&field.path, field.value);
	}
	Ok(())
}
