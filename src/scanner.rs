//! Turns shader source text into tokens.
//!
//! The scanner knows the full operator set of the language, the builtin type
//! keywords and the literal grammar:
//!
//! ``` BNF
//! literal   → integer | integer ( "u" | "U" ) | float | float ( "f" | "F" ) | float ( "lf" | "LF" ) ;
//! integer   → decimal | "0" octal | "0x" hexadecimal ;
//! float     → digits "." digits? exponent? | "." digits exponent? | digits exponent ;
//! exponent  → ( "e" | "E" ) ( "+" | "-" )? digits ;
//! ```
//!
//! Keywords are only recognized after the whole word was read, this is
//! `maximal munch`: `vec3x` is an identifier, not `vec3` followed by `x`.
mod token;

use std::{iter::Peekable, str::CharIndices};

use TokenType::*;
use anyhow::Context;
pub use token::*;

use crate::{ScanError, ScanErrorType, ScannerError, SlError};

/// A scanner for shader source code
pub struct Scanner<'a> {
	/// User input source code
	source:      &'a str,
	/// User input source code iterator
	source_iter: Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:       usize,
	/// Points at the character currently being considered
	cursor:      usize,
	/// Tracks what source line `current` is on so we can produce tokens that know
	/// their location.
	line:        usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1 }
	}

	/// Scan all tokens from the source code.
	///
	/// Scanning continues after a bad lexeme so every error of the input is
	/// reported at once.
	pub fn scan_tokens(mut self) -> Result<Vec<Token<'a>>, SlError> {
		let mut tokens = Vec::new();
		let mut errors = Vec::new();
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = self.start;
			match self.scan_token(&mut tokens) {
				Err(ScannerError::ScanError(e)) => {
					log::debug!("scan error: {e}");
					errors.push(e);
				}
				Err(ScannerError::InternalError(e)) => {
					return Err(e.into());
				}
				Ok(_) => {}
			}
		}
		if !errors.is_empty() {
			return Err(SlError::ScannerErrors(errors));
		}
		tokens.push(Token::new(Eof, "", self.line));
		log::trace!("scanned {} tokens", tokens.len());
		Ok(tokens)
	}

	/// Scan a single token from the source code
	fn scan_token(&mut self, tokens: &mut Vec<Token<'a>>) -> Result<(), ScannerError> {
		let next_char = self.advance().context("Unexpected EOF")?;
		#[rustfmt::skip]
		let r#type = match next_char {
			'(' => LeftParen,
			')' => RightParen,
			'[' => LeftBracket,
			']' => RightBracket,
			'{' => LeftBrace,
			'}' => RightBrace,
			',' => Comma,
			':' => Colon,
			';' => Semicolon,
			'?' => Question,
			'~' => Tilde,
			'.' => if self.peek().is_some_and(|c| c.is_ascii_digit()) { self.number()? } else { Dot },
			'+' => if self.match_next('+') { PlusPlus } else if self.match_next('=') { PlusEqual } else { Plus },
			'-' => if self.match_next('-') { MinusMinus } else if self.match_next('=') { MinusEqual } else { Minus },
			'*' => if self.match_next('=') { StarEqual } else { Star },
			'%' => if self.match_next('=') { PercentEqual } else { Percent },
			'!' => if self.match_next('=') { BangEqual } else { Bang },
			'=' => if self.match_next('=') { EqualEqual } else { Equal },
			'<' => if self.match_next('<') {
				if self.match_next('=') { LessLessEqual } else { LessLess }
			} else if self.match_next('=') { LessEqual } else { Less },
			'>' => if self.match_next('>') {
				if self.match_next('=') { GreaterGreaterEqual } else { GreaterGreater }
			} else if self.match_next('=') { GreaterEqual } else { Greater },
			'&' => if self.match_next('&') { AmpAmp } else if self.match_next('=') { AmpEqual } else { Amp },
			'^' => if self.match_next('^') { CaretCaret } else if self.match_next('=') { CaretEqual } else { Caret },
			'|' => if self.match_next('|') { PipePipe } else if self.match_next('=') { PipeEqual } else { Pipe },
			'/' => if self.match_next('/') {
				while self.peek().is_some_and(|c| c != '\n') { self.advance(); }
				Comment
			} else if self.match_next('*') {
				let mut closed = false;
				while let Some(c) = self.peek() {
					if c == '*' && self.peek_second().is_some_and(|c| c == '/') {
						self.advance(); // consume '*'
						self.advance(); // consume '/'
						closed = true;
						break;
					}
					if c == '\n' { self.line += 1; }
					self.advance();
				}
				if closed { Comment } else { return Err(ScanError::new(self.line, ScanErrorType::UnterminatedBlockComment).into()) }
			} else if self.match_next('=') { SlashEqual } else { Slash },
			' ' | '\r' | '\t' => EmptyChar,
			'\n' => { self.line += 1; NewLine }
			c if c.is_ascii_digit() => self.number()?,
			c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
			_ => return Err(ScanError::new(self.line, ScanErrorType::UnexpectedCharacter(next_char)).into()),
		};

		if !r#type.is_ignored() {
			let lexeme = &self.source[self.start..self.cursor];
			tokens.push(Token::new(r#type, lexeme, self.line));
		}

		Ok(())
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	fn skip_digits(&mut self, radix: u32) {
		while self.peek().is_some_and(|c| c.is_digit(radix)) {
			self.advance();
		}
	}

	/// Scan a numeric literal; the first character is already consumed.
	fn number(&mut self) -> Result<TokenType<'a>, ScannerError> {
		let first = &self.source[self.start..self.cursor];
		let hexadecimal = first == "0" && self.peek().is_some_and(|c| c == 'x' || c == 'X');
		let mut fractional = first == ".";

		if hexadecimal {
			self.advance(); // consume 'x'
			self.skip_digits(16);
		} else {
			self.skip_digits(10);
			if !fractional && self.peek() == Some('.') {
				self.advance(); // consume '.'
				fractional = true;
			}
			if fractional {
				self.skip_digits(10);
			}
			if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
				self.advance(); // consume 'e'
				if self.peek().is_some_and(|c| c == '+' || c == '-') {
					self.advance();
				}
				fractional = true;
				if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
					return Err(self.invalid_number());
				}
				self.skip_digits(10);
			}
		}
		let digits_end = self.cursor;

		let r#type = if !hexadecimal && (self.match_next('l') || self.match_next('L')) {
			if !(self.match_next('f') || self.match_next('F')) {
				return Err(self.invalid_number());
			}
			self.float_literal(digits_end, true)?
		} else if !hexadecimal && (self.match_next('f') || self.match_next('F')) {
			self.float_literal(digits_end, false)?
		} else if fractional {
			self.float_literal(digits_end, false)?
		} else {
			let unsigned = self.match_next('u') || self.match_next('U');
			let text = &self.source[self.start..digits_end];
			let (digits, radix) = if hexadecimal {
				(&text[2..], 16)
			} else if text.len() > 1 && text.starts_with('0') {
				(&text[1..], 8)
			} else {
				(text, 10)
			};
			if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
				return Err(self.invalid_number());
			}
			let value = u32::from_str_radix(digits, radix)
				.map_err(|_| ScanError::new(self.line, ScanErrorType::NumberOutOfRange(text.to_string())))?;
			if unsigned { UintConstant(value) } else { IntConstant(value as i32) }
		};

		if self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			return Err(self.invalid_number());
		}
		Ok(r#type)
	}

	/// Literals too large for their type are rejected rather than becoming infinite.
	fn float_literal(&self, digits_end: usize, double: bool) -> Result<TokenType<'a>, ScannerError> {
		let text = &self.source[self.start..digits_end];
		let (r#type, finite) = if double {
			let value: f64 = text.parse().context("Failed to parse double literal")?;
			(DoubleConstant(value), value.is_finite())
		} else {
			let value: f32 = text.parse().context("Failed to parse float literal")?;
			(FloatConstant(value), value.is_finite())
		};
		if !finite {
			return Err(ScanError::new(self.line, ScanErrorType::NumberOutOfRange(text.to_string())).into());
		}
		Ok(r#type)
	}

	/// Consumes the rest of a malformed literal and reports it.
	fn invalid_number(&mut self) -> ScannerError {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
			self.advance();
		}
		let literal = self.source[self.start..self.cursor].to_string();
		ScanError::new(self.line, ScanErrorType::InvalidNumber(literal)).into()
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> TokenType<'a> {
		while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
			self.advance();
		}
		let text = &self.source[self.start..self.cursor];
		TokenType::keyword_or_identifier(text)
	}
}
