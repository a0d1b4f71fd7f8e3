use std::path::PathBuf;

use palc::{Parser, Subcommand};

/// Environment variable holding the log filter, e.g. `SLC_LOG=debug`.
pub const LOG_ENV: &str = "SLC_LOG";

#[derive(Parser)]
#[command(name = "slc", after_long_help = "Compiles shading language expressions to SPIR-V.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Compile a source file, print the listing and module words
	File { path: PathBuf },
	/// Compile a source file, print the disassembled module
	Disassemble { path: PathBuf },
	/// Compile statements line by line
	Repl,
}

/// Logs to stderr with the filter from [`LOG_ENV`], silent if it is unset.
pub fn init_logging() {
	let env = env_logger::Env::new().filter_or(LOG_ENV, "off");
	if let Err(e) = env_logger::Builder::from_env(env).try_init() {
		eprintln!("Failed init logging: {e}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn logging_installs_once() {
		init_logging();
		init_logging();
		if std::env::var(LOG_ENV).is_err() {
			assert_eq!(log::max_level(), log::LevelFilter::Off);
		}
	}
}
