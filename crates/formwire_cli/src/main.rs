#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

const DEFAULT_LOG_FILTER: &str = "formwire=warn";

#[derive(Parser)]
#[command(name = "formwire", about = "multipart/form-data encoding tools")]
struct Cli {
	/// Log filter directive; overrides RUST_LOG when given.
	#[arg(long = "log-level", global = true)]
	log_level: Option<String>,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Encode a JSON document as a multipart body.
	Encode(cmd::encode::Args),
	/// Print the flattened fields of a JSON document.
	Fields(cmd::fields::Args),
	/// List files in a directory with their detected MIME types.
	Mime(cmd::mime::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> formwire::form::Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.log_level.as_deref());

	match cli.command {
		Commands::Encode(args) => cmd::encode::run(args),
		Commands::Fields(args) => cmd::fields::run(args),
		Commands::Mime(args) => cmd::mime::run(args),
	}
}

fn init_tracing(log_level: Option<&str>) {
	let filter = match log_level {
		Some(directive) => EnvFilter::new(directive),
		None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
	};
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
