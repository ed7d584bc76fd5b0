use std::path::PathBuf;

use formwire::form::{DateStrategy, EncodeOptions, FieldPath, FormData, FormError, Result, encode_value, flatten};
use tracing::debug;

use crate::cmd::document::Document;
use crate::cmd::util::{DEFAULT_DATE_STRATEGY, emit_json, part_text, read_json};

#[derive(clap::Args)]
pub struct Args {
	pub input: PathBuf,
	#[arg(long = "date-strategy", default_value = DEFAULT_DATE_STRATEGY)]
	pub date_strategy: DateStrategy,
	/// Only list fields at or below this path, e.g. `address` or `tags[1]`.
	#[arg(long)]
	pub select: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print the flattened `(path, value)` list of a JSON document.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		date_strategy,
		select,
		json,
	} = args;

	let prefix = select
		.map(|raw| FieldPath::parse(&raw).ok_or_else(|| FormError::Custom(format!("invalid field path: {raw}"))))
		.transpose()?;

	let document = read_json(&input)?;
	let options = EncodeOptions { date_strategy };
	let fields = flatten(encode_value(&Document(&document), &options)?)?;

	// Render through a form so listed values match the encoded body.
	let mut form = FormData::with_boundary("fields");
	form.date_strategy = options.date_strategy;
	let mut rows = Vec::new();
	for field in fields {
		if let Some(prefix) = &prefix
			&& !FieldPath::parse(&field.path).is_some_and(|path| path.starts_with(prefix))
		{
			continue;
		}
		let kind = field.value.kind();
		let index = form.len();
		form.append(&field.path, field.value);
		let Some(item) = form.items().get(index) else {
			debug!(path = %field.path, "field dropped from form");
			continue;
		};
		rows.push(FieldJson {
			path: field.path,
			kind,
			value: part_text(item),
		});
	}

	if json {
		return emit_json(&rows);
	}

	for row in &rows {
		println!("{}\t{}\t{}", row.path, row.kind, row.value);
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct FieldJson {
	path: String,
	kind: &'static str,
	value: String,
}
