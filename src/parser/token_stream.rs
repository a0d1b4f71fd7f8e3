use crate::{
	Diagnostic,
	scanner::{Token, TokenType},
};

/// Tokens with one token of lookahead plus the diagnostics reported while
/// reading them.
pub struct TokenStream<'a> {
	tokens:      Vec<Token<'a>>,
	current:     usize,
	diagnostics: Vec<Diagnostic>,
}

impl<'a> TokenStream<'a> {
	pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
		if tokens.last().is_none_or(|token| token.r#type != TokenType::Eof) {
			let line = tokens.last().map_or(1, |token| token.line);
			tokens.push(Token::new(TokenType::Eof, "", line));
		}
		Self { tokens, current: 0, diagnostics: Vec::new() }
	}

	/// The current token.
	pub fn get(&self) -> &Token<'a> { &self.tokens[self.current] }

	/// The token after the current one, `Eof` once the end is reached.
	pub fn peek_next(&self) -> &Token<'a> { &self.tokens[(self.current + 1).min(self.tokens.len() - 1)] }

	/// The most recently consumed token.
	pub fn previous(&self) -> Option<&Token<'a>> { self.current.checked_sub(1).map(|i| &self.tokens[i]) }

	/// Moves past the current token and returns it. `Eof` is never consumed.
	pub fn consume(&mut self) -> Token<'a> {
		let token = self.tokens[self.current].clone();
		if !self.is_at_end() {
			self.current += 1;
		}
		token
	}

	pub fn is_at_end(&self) -> bool { self.get().r#type == TokenType::Eof }

	/// Records a diagnostic at the line of the current token.
	pub fn error(&mut self, message: impl Into<String>) {
		let diagnostic = Diagnostic::new(self.get().line, message);
		log::debug!("{diagnostic}");
		self.diagnostics.push(diagnostic);
	}

	pub fn into_diagnostics(self) -> Vec<Diagnostic> { self.diagnostics }
}
