pub mod codegen;
pub mod parser;
pub mod scanner;
pub mod typecheck;

use std::fmt::Display;

use crate::{Diagnostic, ScanError, WriteError};

/// SlError is the top-level error type of the compiler.
#[derive(thiserror::Error, Debug)]
pub enum SlError {
	/// Internal compiler error, should never happen
	#[error("CompilerInternalError: {0}")]
	InternalError(#[from] anyhow::Error),
	/// Scanner errors encountered during scanning
	#[error("ScannerErrors:\n{}", display_errors(.0))]
	ScannerErrors(Vec<ScanError>),
	/// Diagnostics reported while parsing
	#[error("ParseErrors:\n{}", display_errors(.0))]
	ParseErrors(Vec<Diagnostic>),
	/// Code generation failures
	#[error(transparent)]
	WriteError(#[from] WriteError),
}

fn display_errors<E: Display>(errors: &[E]) -> String {
	errors.iter().map(|e| format!("{}", e)).collect::<Vec<String>>().join("\n")
}
