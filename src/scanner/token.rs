use crate::types::Type;

/// A token produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
	pub r#type: TokenType<'a>,
	pub lexeme: &'a str,
	pub line:   usize,
}

impl<'a> Token<'a> {
	pub fn new(r#type: TokenType<'a>, lexeme: &'a str, line: usize) -> Self { Self { r#type, lexeme, line } }
}

/// The different types of tokens of the shading language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType<'a> {
	/// New Line Character `\n`.
	NewLine,
	/// Empty Character: ` `, `\r`, `\t`.
	EmptyChar,
	/// Comment `//` or /* ... */
	Comment,
	/// Left parenthesis `(`.
	LeftParen,
	/// Right parenthesis `)`.
	RightParen,
	/// Left bracket `[`.
	LeftBracket,
	/// Right bracket `]`.
	RightBracket,
	/// Left brace `{`.
	LeftBrace,
	/// Right brace `}`.
	RightBrace,
	/// Comma `,`.
	Comma,
	/// Dot `.`.
	Dot,
	/// Colon `:`.
	Colon,
	/// Semicolon `;`.
	Semicolon,
	/// Question mark `?`.
	Question,
	/// Bang `!`.
	Bang,
	/// Tilde `~`.
	Tilde,
	/// Plus `+`.
	Plus,
	/// Minus `-`.
	Minus,
	/// Asterisk `*`.
	Star,
	/// Slash `/`.
	Slash,
	/// Percent `%`.
	Percent,
	/// Increment `++`.
	PlusPlus,
	/// Decrement `--`.
	MinusMinus,
	/// Left shift `<<`.
	LessLess,
	/// Right shift `>>`.
	GreaterGreater,
	/// Less than `<`.
	Less,
	/// Greater than `>`.
	Greater,
	/// Less than or equal `<=`.
	LessEqual,
	/// Greater than or equal `>=`.
	GreaterEqual,
	/// Equal equal `==`.
	EqualEqual,
	/// Bang equal `!=`.
	BangEqual,
	/// Bitwise and `&`.
	Amp,
	/// Bitwise xor `^`.
	Caret,
	/// Bitwise or `|`.
	Pipe,
	/// Logical and `&&`.
	AmpAmp,
	/// Logical xor `^^`.
	CaretCaret,
	/// Logical or `||`.
	PipePipe,
	/// Assignment `=`.
	Equal,
	/// `*=`.
	StarEqual,
	/// `/=`.
	SlashEqual,
	/// `%=`.
	PercentEqual,
	/// `+=`.
	PlusEqual,
	/// `-=`.
	MinusEqual,
	/// `<<=`.
	LessLessEqual,
	/// `>>=`.
	GreaterGreaterEqual,
	/// `&=`.
	AmpEqual,
	/// `^=`.
	CaretEqual,
	/// `|=`.
	PipeEqual,
	/// Identifier, e.g. variable name.
	Identifier(&'a str),
	/// Builtin type keyword, e.g. `vec3` or `mat2x4`.
	TypeName(Type),
	/// Signed integer literal, e.g. `42`.
	IntConstant(i32),
	/// Unsigned integer literal, e.g. `42u`.
	UintConstant(u32),
	/// Single precision literal, e.g. `1.5`.
	FloatConstant(f32),
	/// Double precision literal, e.g. `1.5lf`.
	DoubleConstant(f64),
	/// Boolean literal `true` or `false`.
	BoolConstant(bool),
	/// End of file/input.
	Eof,
}

impl<'a> TokenType<'a> {
	pub fn is_ignored(&self) -> bool {
		matches!(self, TokenType::EmptyChar | TokenType::NewLine | TokenType::Comment)
	}

	pub fn keyword_or_identifier(value: &'a str) -> Self {
		match value {
			"true" => TokenType::BoolConstant(true),
			"false" => TokenType::BoolConstant(false),
			_ => match Type::from_keyword(value) {
				Some(ty) => TokenType::TypeName(ty),
				None => TokenType::Identifier(value),
			},
		}
	}
}
