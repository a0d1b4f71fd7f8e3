/// A recoverable error reported while parsing.
///
/// Diagnostics never stop the parser; they are collected in the order they
/// are reported and handed to the caller together with whatever expression
/// survived.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct Diagnostic {
	pub line:    usize,
	pub message: String,
}

impl Diagnostic {
	pub fn new(line: usize, message: impl Into<String>) -> Self { Self { line, message: message.into() } }
}
