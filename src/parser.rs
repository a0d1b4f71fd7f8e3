//! The `Scanner` use `Lexical grammar`, implement `alphabet` as `Characters`,
//! `string` as `Lexme` or `Token`
//! The `Parser` use `Syntactic grammar`, implement `alphabet` as `Tokens`,
//! `string` as `Expression`
//!
//! Every node is type checked the moment it is built. A node failing the
//! check is reported and dropped, parsing continues with the operand on the
//! left, so one mistake produces one diagnostic and the rest of the
//! statement is still checked.
//!
//! |Name|Operators|Associates
//! --|--|--
//! Assignment|= *= /= %= += -= <<= >>= &= ^= \|=|Right
//! Logical or|\|\||Left
//! Logical xor|^^|Left
//! Logical and|&&|Left
//! Bitwise or|\||Left
//! Bitwise xor|^|Left
//! Bitwise and|&|Left
//! Equality|== !=|Left
//! Relational|< > <= >=|Left
//! Shift|<< >>|Left
//! Additive|+ -|Left
//! Multiplicative|* / %|Left
//!
//! Grammar:
//!
//! ``` BNF
//! program        → statement* EOF ;
//! statement      → declaration | expression ";" ;
//! declaration    → TYPE IDENTIFIER ";" ;
//! expression     → assignment ;
//! assignment     → logical_or ( ASSIGN_OP assignment )? ;
//! logical_or     → logical_xor ( "||" logical_xor )* ;
//! logical_xor    → logical_and ( "^^" logical_and )* ;
//! logical_and    → or ( "&&" or )* ;
//! or             → xor ( "|" xor )* ;
//! xor            → and ( "^" and )* ;
//! and            → equality ( "&" equality )* ;
//! equality       → relational ( ( "==" | "!=" ) relational )* ;
//! relational     → shift ( ( "<" | ">" | "<=" | ">=" ) shift )* ;
//! shift          → additive ( ( "<<" | ">>" ) additive )* ;
//! additive       → multiplicative ( ( "+" | "-" ) multiplicative )* ;
//! multiplicative → primary ( ( "*" | "/" | "%" ) primary )* ;
//! primary        → IDENTIFIER | LITERAL | TYPE "(" ( assignment ( "," assignment )* )? ")" ;
//! ```
mod token_stream;

use std::rc::Rc;

use TokenType::*;
pub use token_stream::TokenStream;

use crate::{
	Diagnostic,
	error::typecheck::{Side, TypeError},
	expression::{
		AssignOp, Assignment, Constant, ExprArena, ExprId, FunctionCall, Operation, Operator, Reference, check,
	},
	function::Function,
	scanner::{Token, TokenType},
	scope::{Scope, Variable},
	types::Type,
};

/// A top level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// `type name;`
	Declaration(Rc<Variable>),
	/// `expression;`, the arena holds one reference for the statement.
	Expression(ExprId),
}

/// Everything a program parse produced.
#[derive(Debug, Default)]
pub struct Parsed {
	pub statements:  Vec<Statement>,
	pub diagnostics: Vec<Diagnostic>,
}

pub struct Parser<'a, 's> {
	stream: TokenStream<'a>,
	scope:  &'s mut Scope,
	arena:  &'s mut ExprArena,
}

impl<'a, 's> Parser<'a, 's> {
	pub fn new(tokens: Vec<Token<'a>>, scope: &'s mut Scope, arena: &'s mut ExprArena) -> Self {
		Self { stream: TokenStream::new(tokens), scope, arena }
	}

	/// Parses statements until the end of input.
	pub fn parse_program(mut self) -> Parsed {
		let mut statements = Vec::new();
		while !self.stream.is_at_end() {
			if let Some(statement) = self.statement() {
				statements.push(statement);
			}
		}
		Parsed { statements, diagnostics: self.stream.into_diagnostics() }
	}

	/// Parses a single expression. `None` means nothing usable was left after
	/// reporting the errors.
	pub fn parse_expression(&mut self) -> Option<ExprId> { self.assignment() }

	pub fn finish(self) -> Vec<Diagnostic> { self.stream.into_diagnostics() }

	fn statement(&mut self) -> Option<Statement> {
		let declaration = match (&self.stream.get().r#type, &self.stream.peek_next().r#type) {
			(TypeName(ty), Identifier(name)) => Some((*ty, *name)),
			_ => None,
		};
		let statement = match declaration {
			Some((ty, name)) => self.declaration(ty, name),
			None => self.parse_expression().map(Statement::Expression),
		};

		if self.stream.get().r#type == Semicolon {
			self.stream.consume();
			return statement;
		}
		// A missing operand swallows the token after the operator, which may
		// have been the `;`.
		if self.stream.previous().is_some_and(|token| token.r#type == Semicolon) {
			return statement;
		}

		if statement.is_some() {
			self.stream.error("Expected \";\" at end of statement.");
		}
		self.synchronize();
		if let Some(Statement::Expression(id)) = statement {
			self.arena.release(id);
		}
		None
	}

	fn declaration(&mut self, ty: Type, name: &str) -> Option<Statement> {
		self.stream.consume(); // consume type
		self.stream.consume(); // consume name
		if ty == Type::Void {
			self.stream.error(format!("Variable \"{name}\" cannot be of type void."));
			return None;
		}
		let variable = Variable::new(name, ty);
		if let Err(existing) = self.scope.declare(variable.clone()) {
			self.stream.error(format!("Redeclaration of variable \"{}\".", existing.name()));
			return None;
		}
		Some(Statement::Declaration(variable))
	}

	/// Skips past the next `;`.
	fn synchronize(&mut self) {
		while !self.stream.is_at_end() {
			if self.stream.consume().r#type == Semicolon {
				return;
			}
		}
	}

	fn assignment(&mut self) -> Option<ExprId> {
		let lvalue = self.conditional()?;
		let Some(op) = assign_operator(&self.stream.get().r#type) else {
			return Some(lvalue);
		};

		if self.arena.is_constant(lvalue) {
			self.stream.error("Cannot assign to an rvalue.");
			// Keep going to find more errors.
			self.stream.consume();
			self.arena.release(lvalue);
			return self.assignment();
		}

		self.stream.consume(); // consume assignment operator
		let Some(rvalue) = self.assignment() else {
			return Some(lvalue);
		};
		Some(self.arena.alloc(Assignment::new(op, lvalue, rvalue).into()))
	}

	/// `?:` is not supported yet.
	fn conditional(&mut self) -> Option<ExprId> { self.logical_or() }

	fn logical_or(&mut self) -> Option<ExprId> {
		self.logical(Self::logical_xor, Operator::LogicalOr, |t| matches!(t, PipePipe))
	}

	fn logical_xor(&mut self) -> Option<ExprId> {
		self.logical(Self::logical_and, Operator::LogicalXor, |t| matches!(t, CaretCaret))
	}

	fn logical_and(&mut self) -> Option<ExprId> {
		self.logical(Self::or, Operator::LogicalAnd, |t| matches!(t, AmpAmp))
	}

	fn or(&mut self) -> Option<ExprId> { self.binary(Self::xor, |t| matches!(t, Pipe).then_some(Operator::BitOr)) }

	fn xor(&mut self) -> Option<ExprId> { self.binary(Self::and, |t| matches!(t, Caret).then_some(Operator::BitXor)) }

	fn and(&mut self) -> Option<ExprId> { self.binary(Self::equality, |t| matches!(t, Amp).then_some(Operator::BitAnd)) }

	fn equality(&mut self) -> Option<ExprId> {
		self.binary(Self::relational, |t| match t {
			EqualEqual => Some(Operator::Equal),
			BangEqual => Some(Operator::NotEqual),
			_ => None,
		})
	}

	fn relational(&mut self) -> Option<ExprId> {
		self.binary(Self::shift, |t| match t {
			Less => Some(Operator::Less),
			Greater => Some(Operator::Greater),
			LessEqual => Some(Operator::LessEqual),
			GreaterEqual => Some(Operator::GreaterEqual),
			_ => None,
		})
	}

	fn shift(&mut self) -> Option<ExprId> {
		self.binary(Self::additive, |t| match t {
			LessLess => Some(Operator::LeftShift),
			GreaterGreater => Some(Operator::RightShift),
			_ => None,
		})
	}

	fn additive(&mut self) -> Option<ExprId> {
		self.binary(Self::multiplicative, |t| match t {
			Plus => Some(Operator::Add),
			Minus => Some(Operator::Sub),
			_ => None,
		})
	}

	fn multiplicative(&mut self) -> Option<ExprId> {
		self.binary(Self::unary, |t| match t {
			Star => Some(Operator::Mul),
			Slash => Some(Operator::Div),
			Percent => Some(Operator::Mod),
			_ => None,
		})
	}

	/// Prefix operators are not supported yet.
	fn unary(&mut self) -> Option<ExprId> { self.postfix() }

	/// Member access, indexing and postfix increments are not supported yet.
	fn postfix(&mut self) -> Option<ExprId> { self.primary() }

	fn primary(&mut self) -> Option<ExprId> {
		let constant = match self.stream.get().r#type.clone() {
			Identifier(name) => {
				let Some(variable) = self.scope.lookup(name) else {
					self.stream.error(format!("No variable named \"{name}\"."));
					self.stream.consume();
					return None;
				};
				self.stream.consume();
				return Some(self.arena.alloc(Reference::new(variable).into()));
			}
			TypeName(ty) => {
				self.stream.consume(); // consume type
				return self.constructor_call(ty);
			}
			IntConstant(value) => Constant::Int(value),
			UintConstant(value) => Constant::Uint(value),
			FloatConstant(value) => Constant::Float(value),
			DoubleConstant(value) => Constant::Double(value),
			BoolConstant(value) => Constant::Bool(value),
			_ => {
				self.stream.error("Expected an expression.");
				self.stream.consume();
				return None;
			}
		};
		self.stream.consume();
		Some(self.arena.alloc(constant.into()))
	}

	fn constructor_call(&mut self, ty: Type) -> Option<ExprId> {
		let function = Function::constructor(ty);
		if self.stream.get().r#type != LeftParen {
			self.stream.error("Expected opening \"(\" when calling constructor");
			return None;
		}
		self.stream.consume(); // consume '('

		let mut arguments = Vec::new();
		let mut fail = false;
		if self.stream.get().r#type != RightParen {
			loop {
				match self.assignment() {
					Some(argument) => arguments.push(argument),
					None => fail = true,
				}
				if self.stream.get().r#type != Comma {
					break;
				}
				self.stream.consume(); // consume ','
			}
		}

		let types: Result<Vec<Type>, TypeError> = arguments.iter().map(|&argument| self.arena.return_type(argument)).collect();
		match types.map(|types| function.matches(&types)) {
			Ok(Ok(())) => {}
			Ok(Err(message)) => {
				self.stream.error(message);
				fail = true;
			}
			Err(e) => {
				self.stream.error(e.to_string());
				fail = true;
			}
		}

		let call = self.arena.alloc(FunctionCall::new(function, arguments).into());
		if self.stream.get().r#type != RightParen {
			self.stream.error("Expected closing \")\" after arguments.");
			self.arena.release(call);
			return None;
		}
		self.stream.consume(); // consume ')'

		if fail {
			log::debug!("discarding call {}", self.arena.print(call));
			self.arena.release(call);
			return None;
		}
		Some(call)
	}

	/// Left associative binary operators.
	///
	/// An operation whose operands fail the type check is dropped and the
	/// left operand carries on as the result.
	fn binary<F>(&mut self, next: fn(&mut Self) -> Option<ExprId>, operator: F) -> Option<ExprId>
	where
		F: Fn(&TokenType<'a>) -> Option<Operator>,
	{
		let mut expression = next(self)?;
		while let Some(op) = operator(&self.stream.get().r#type) {
			self.stream.consume(); // consume operator
			let Some(right) = next(self) else {
				continue;
			};
			let operation = self.arena.alloc(Operation::new(op, expression, right).into());
			let checked = self.operand_types(expression, right).and_then(|(l, r)| op.result_type(&l, &r));
			match checked {
				Ok(_) => expression = operation,
				Err(e) => {
					self.stream.error(e.to_string());
					self.discard(operation, expression);
				}
			}
		}
		Some(expression)
	}

	/// `&&`, `^^` and `||`.
	///
	/// Both operands have to be `bool`. A bad right operand is dropped in
	/// favour of the left one and the other way around.
	fn logical<F>(&mut self, next: fn(&mut Self) -> Option<ExprId>, op: Operator, matches: F) -> Option<ExprId>
	where
		F: Fn(&TokenType<'a>) -> bool,
	{
		let mut expression = next(self)?;
		while matches(&self.stream.get().r#type) {
			self.stream.consume(); // consume operator
			let Some(right) = next(self) else {
				continue;
			};
			let operation = self.arena.alloc(Operation::new(op, expression, right).into());
			let (ltype, rtype) = match self.operand_types(expression, right) {
				Ok(types) => types,
				Err(e) => {
					self.stream.error(e.to_string());
					self.discard(operation, expression);
					continue;
				}
			};

			if let Err(e) = check::logical_operand(Side::Right, op.symbol(), &rtype) {
				self.stream.error(e.to_string());
				self.discard(operation, expression);
			} else if let Err(e) = check::logical_operand(Side::Left, op.symbol(), &ltype) {
				self.stream.error(e.to_string());
				self.discard(operation, right);
				expression = right;
			} else {
				expression = operation;
			}
		}
		Some(expression)
	}

	fn operand_types(&self, left: ExprId, right: ExprId) -> Result<(Type, Type), TypeError> {
		Ok((self.arena.return_type(left)?, self.arena.return_type(right)?))
	}

	/// Frees `operation` but keeps `survivor`, one of its operands, alive.
	fn discard(&mut self, operation: ExprId, survivor: ExprId) {
		log::debug!("discarding {}", self.arena.print(operation));
		self.arena.retain(survivor);
		self.arena.release(operation);
	}
}

fn assign_operator(r#type: &TokenType) -> Option<AssignOp> {
	Some(match r#type {
		Equal => AssignOp::Assign,
		StarEqual => AssignOp::Mul,
		SlashEqual => AssignOp::Div,
		PercentEqual => AssignOp::Mod,
		PlusEqual => AssignOp::Add,
		MinusEqual => AssignOp::Sub,
		LessLessEqual => AssignOp::LeftShift,
		GreaterGreaterEqual => AssignOp::RightShift,
		AmpEqual => AssignOp::And,
		CaretEqual => AssignOp::Xor,
		PipeEqual => AssignOp::Or,
		_ => return None,
	})
}
