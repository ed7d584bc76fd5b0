use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use formwire::form::{DateStrategy, EncodeOptions, FormData, Result, encode_value, write_form};
use tracing::info;

use crate::cmd::document::Document;
use crate::cmd::util::{DEFAULT_DATE_STRATEGY, read_json};

#[derive(clap::Args)]
pub struct Args {
	pub input: PathBuf,
	#[arg(long = "date-strategy", default_value = DEFAULT_DATE_STRATEGY)]
	pub date_strategy: DateStrategy,
	#[arg(long)]
	pub boundary: Option<String>,
	#[arg(long)]
	pub out: Option<PathBuf>,
}

/// Encode a JSON document and write the multipart body.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		date_strategy,
		boundary,
		out,
	} = args;

	let document = read_json(&input)?;
	let options = EncodeOptions { date_strategy };
	let tree = encode_value(&Document(&document), &options)?;

	let mut form = match boundary {
		Some(boundary) => FormData::with_boundary(boundary),
		None => FormData::new(),
	};
	form.date_strategy = options.date_strategy;
	write_form(tree, &mut form)?;

	let body = form.body_for_http_request();
	info!(parts = form.len(), bytes = body.len(), "encoded form");
	match out {
		Some(path) => fs::write(path, &body)?,
		None => {
			let mut stdout = io::stdout().lock();
			stdout.write_all(&body)?;
			stdout.flush()?;
		}
	}
	eprintln!("content-type: {}", form.content_type_for_http_request());
	Ok(())
}

#[cfg(test)]
mod tests;
