//! Operand type rules of the binary operators.
//!
//! Every check is a pure function of the two operand types and either yields
//! the result type or the reason the operands are rejected.
use crate::{
	error::typecheck::{Side, TypeError},
	types::{ScalarKind, Type},
};

/// `*`, `/`, `+` and `-`.
///
/// Only `*` between matrices and vectors is a linear algebra product, every
/// other combination works component wise.
pub fn arithmetic(multiply: bool, left: &Type, right: &Type) -> Result<Type, TypeError> {
	let (lscalar, rscalar) = (left.scalar_kind(), right.scalar_kind());
	let scalar = if rscalar.converts_to(lscalar) {
		lscalar
	} else if lscalar.converts_to(rscalar) {
		rscalar
	} else {
		return Err(TypeError::IncompatibleScalars { left: *left, right: *right });
	};

	match (*left, *right) {
		(Type::Matrix { columns: lcolumns, rows: lrows, .. }, Type::Matrix { columns: rcolumns, rows: rrows, .. }) => {
			if multiply {
				if lcolumns != rrows {
					return Err(TypeError::MatrixDimensions);
				}
				Ok(Type::matrix(scalar, rcolumns, lrows))
			} else if right.converts_to(left) {
				Ok(*left)
			} else if left.converts_to(right) {
				Ok(*right)
			} else {
				Err(TypeError::MatrixSize { left: *left, right: *right })
			}
		}
		(Type::Matrix { columns, rows, .. }, Type::Vector { length, .. }) => {
			if !multiply {
				return Err(TypeError::MatrixVectorArithmetic);
			}
			if columns != length {
				return Err(TypeError::MatrixColumns);
			}
			Ok(Type::vector(scalar, rows))
		}
		(Type::Matrix { columns, rows, .. }, Type::Scalar(_)) => Ok(Type::matrix(scalar, columns, rows)),
		(Type::Vector { length, .. }, Type::Matrix { columns, rows, .. }) => {
			if !multiply {
				return Err(TypeError::VectorMatrixArithmetic);
			}
			if length != rows {
				return Err(TypeError::MatrixRows { vector: *left, matrix: *right });
			}
			Ok(Type::vector(scalar, columns))
		}
		(Type::Vector { length: llength, .. }, Type::Vector { length: rlength, .. }) => {
			if llength != rlength {
				return Err(TypeError::VectorLength { left: *left, right: *right });
			}
			Ok(Type::vector(scalar, llength))
		}
		(Type::Vector { length, .. }, Type::Scalar(_)) => Ok(Type::vector(scalar, length)),
		(Type::Scalar(_), Type::Matrix { columns, rows, .. }) => Ok(Type::matrix(scalar, columns, rows)),
		(Type::Scalar(_), Type::Vector { length, .. }) => Ok(Type::vector(scalar, length)),
		(Type::Scalar(_), Type::Scalar(_)) => Ok(Type::scalar(scalar)),
		(Type::Void, _) => Err(TypeError::ArithmeticOperand { side: Side::Left, ty: *left }),
		(_, _) => Err(TypeError::ArithmeticOperand { side: Side::Right, ty: *right }),
	}
}

/// `%`, `&`, `^` and `|`.
pub fn bitwise(left: &Type, right: &Type) -> Result<Type, TypeError> {
	integer_operands(left, right)?;

	let scalar = if left.scalar_kind() == ScalarKind::Uint { ScalarKind::Uint } else { right.scalar_kind() };
	match (*left, *right) {
		(Type::Scalar(_), Type::Scalar(_)) => Ok(Type::scalar(scalar)),
		(Type::Vector { length, .. }, _) | (_, Type::Vector { length, .. }) => Ok(Type::vector(scalar, length)),
		_ => unreachable!("operands are scalars or vectors"),
	}
}

/// `<<` and `>>`; the result has the type of the shifted value.
pub fn shift(left: &Type, right: &Type) -> Result<Type, TypeError> {
	integer_operands(left, right)?;
	if left.is_scalar() && right.is_vector() {
		return Err(TypeError::ShiftScalarByVector);
	}
	Ok(*left)
}

/// `<`, `>`, `<=` and `>=` compare two numeric scalars.
pub fn relational(left: &Type, right: &Type) -> Result<Type, TypeError> {
	for (side, ty) in [(Side::Left, left), (Side::Right, right)] {
		if !ty.is_scalar() {
			return Err(TypeError::RelationalNotScalar { side });
		}
		if ty.scalar_kind() == ScalarKind::Bool {
			return Err(TypeError::RelationalBool { side });
		}
	}
	Ok(Type::BOOL)
}

/// One operand of `&&`, `^^` or `||`.
pub fn logical_operand(side: Side, operator: &'static str, ty: &Type) -> Result<(), TypeError> {
	if ty.converts_to(&Type::BOOL) { Ok(()) } else { Err(TypeError::NotBool { side, operator, ty: *ty }) }
}

fn integer_operands(left: &Type, right: &Type) -> Result<(), TypeError> {
	for (side, ty) in [(Side::Left, left), (Side::Right, right)] {
		if !ty.scalar_kind().is_integer() {
			return Err(TypeError::NotInteger { side, ty: *ty });
		}
	}
	for (side, ty) in [(Side::Left, left), (Side::Right, right)] {
		if !ty.is_scalar() && !ty.is_vector() {
			return Err(TypeError::NotScalarOrVector { side, ty: *ty });
		}
	}
	if let (Type::Vector { length: llength, .. }, Type::Vector { length: rlength, .. }) = (*left, *right) {
		if llength != rlength {
			return Err(TypeError::BitwiseVectorLength { left: *left, right: *right });
		}
	}
	Ok(())
}
