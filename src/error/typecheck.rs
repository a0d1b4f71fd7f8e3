use std::fmt::{self, Display};

use crate::types::Type;

/// Which operand of a binary construct a diagnostic talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
	Left,
	Right,
}

impl Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Side::Left => write!(f, "Left"),
			Side::Right => write!(f, "Right"),
		}
	}
}

/// Operand type mismatches found while checking a binary construct.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
	#[error("Operand types {left} and {right} do not share compatible scalar types.")]
	IncompatibleScalars { left: Type, right: Type },
	#[error("Matrices to multiplication have incompatible dimensions.")]
	MatrixDimensions,
	#[error("Matrix types {left} and {right} have different size.")]
	MatrixSize { left: Type, right: Type },
	#[error("Matrix column count doesn't match vector length.")]
	MatrixColumns,
	#[error("Cannot perform arithmetic operation between matrix and vector.")]
	MatrixVectorArithmetic,
	#[error("Vector length for {vector} doesn't match row count for {matrix}.")]
	MatrixRows { vector: Type, matrix: Type },
	#[error("Cannot perform arithmetic operation between vector and matrix.")]
	VectorMatrixArithmetic,
	#[error("Vector operands {left} and {right} to arithmetic operation have different length.")]
	VectorLength { left: Type, right: Type },
	#[error("{side} operand {ty} is incompatible type for arithmetic operation.")]
	ArithmeticOperand { side: Side, ty: Type },
	#[error("{side} operand {ty} is not an integer type.")]
	NotInteger { side: Side, ty: Type },
	#[error("{side} operand {ty} is neither a scalar nor a vector.")]
	NotScalarOrVector { side: Side, ty: Type },
	#[error("Vector operands {left} and {right} do not have the same length.")]
	BitwiseVectorLength { left: Type, right: Type },
	#[error("Right operand to shift cannot be a vector if left operand is a scalar.")]
	ShiftScalarByVector,
	#[error("{side} operand to relational operator is not a scalar.")]
	RelationalNotScalar { side: Side },
	#[error("{side} operand to relational operator must not be bool.")]
	RelationalBool { side: Side },
	#[error("{side} operand of {operator} expression is not bool but {ty}")]
	NotBool { side: Side, operator: &'static str, ty: Type },
}
