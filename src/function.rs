//! Builtin functions callable from expressions.
//!
//! The language has no user defined functions, the only callables are the
//! constructors of the builtin types: `vec3(1.0, 2.0, 3.0)`, `mat2(1.0)`,
//! `int(x)`.
use std::fmt::{self, Display};

use crate::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub enum Function {
	/// Constructs a value of the given type from its components.
	Constructor(Type),
}

impl Function {
	pub fn constructor(ty: Type) -> Self { Function::Constructor(ty) }

	pub fn name(&self) -> String {
		match self {
			Function::Constructor(ty) => ty.to_string(),
		}
	}

	pub fn return_type(&self) -> Type {
		match self {
			Function::Constructor(ty) => *ty,
		}
	}

	/// Checks whether the function can be called with arguments of the given
	/// types, the error is the message to report.
	pub fn matches(&self, arguments: &[Type]) -> Result<(), String> {
		match self {
			Function::Constructor(ty) => constructor_matches(ty, arguments),
		}
	}
}

impl Display for Function {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.name()) }
}

fn constructor_matches(ty: &Type, arguments: &[Type]) -> Result<(), String> {
	if *ty == Type::Void {
		return Err("Cannot construct values of type void.".to_string());
	}

	// A single scalar fills every component, a single matrix is resized.
	if let [argument] = arguments {
		if argument.is_scalar() {
			return Ok(());
		}
		if ty.is_matrix() && argument.is_matrix() {
			return Ok(());
		}
	}

	let needed = ty.components();
	let mut provided = 0;
	for (i, argument) in arguments.iter().enumerate() {
		if provided >= needed {
			return Err(format!("Too many arguments given to builtin constructor, only the first {i} are necessary."));
		}
		if *argument == Type::Void || (ty.is_matrix() && argument.is_matrix()) {
			return Err(format!("Invalid type {argument} for constructor in argument {}", i + 1));
		}
		provided += argument.components();
	}

	if provided < needed {
		return Err(format!(
			"Not enough arguments given to builtin constructor, {} component(s) missing.",
			needed - provided
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::ScalarKind;

	fn vec(n: u32) -> Type { Type::vector(ScalarKind::Float, n) }

	#[test]
	fn vector_constructors() {
		let vec4 = Function::constructor(vec(4));
		assert_eq!(vec4.name(), "vec4");
		assert_eq!(vec4.return_type(), vec(4));
		assert!(vec4.matches(&[Type::FLOAT]).is_ok());
		assert!(vec4.matches(&[Type::FLOAT; 4]).is_ok());
		assert!(vec4.matches(&[vec(3), Type::INT]).is_ok());
		assert!(vec4.matches(&[vec(2), vec(2)]).is_ok());
		assert_eq!(
			vec4.matches(&[vec(3)]),
			Err("Not enough arguments given to builtin constructor, 1 component(s) missing.".to_string())
		);
		assert_eq!(
			vec4.matches(&[vec(4), Type::FLOAT]),
			Err("Too many arguments given to builtin constructor, only the first 1 are necessary.".to_string())
		);
		assert_eq!(
			vec4.matches(&[]),
			Err("Not enough arguments given to builtin constructor, 4 component(s) missing.".to_string())
		);
	}

	#[test]
	fn vector_constructor_may_truncate_last_argument() {
		assert!(Function::constructor(vec(3)).matches(&[vec(2), vec(2)]).is_ok());
		assert!(Function::constructor(Type::FLOAT).matches(&[vec(4)]).is_ok());
	}

	#[test]
	fn matrix_constructors() {
		let mat2 = Function::constructor(Type::matrix(ScalarKind::Float, 2, 2));
		assert!(mat2.matches(&[Type::FLOAT]).is_ok());
		assert!(mat2.matches(&[Type::matrix(ScalarKind::Float, 4, 4)]).is_ok());
		assert!(mat2.matches(&[vec(2), vec(2)]).is_ok());
		assert!(mat2.matches(&[Type::FLOAT, Type::FLOAT, vec(2)]).is_ok());
		assert_eq!(
			mat2.matches(&[Type::matrix(ScalarKind::Float, 2, 2), Type::FLOAT]),
			Err("Invalid type mat2 for constructor in argument 1".to_string())
		);
	}

	#[test]
	fn void_is_not_constructible() {
		assert!(Function::constructor(Type::Void).matches(&[]).is_err());
		assert!(Function::constructor(Type::INT).matches(&[Type::Void]).is_err());
	}
}
