//! Types of the shading language.
//!
//! Every value has a shape, scalar, vector or matrix, built on top of one of
//! the scalar kinds. Implicit conversions only ever widen the scalar kind,
//! they never change the shape.
//!
//! |Kind|Converts to
//! --|--
//! bool|bool
//! int|int uint float double
//! uint|uint float double
//! float|float double
//! double|double
//! void|nothing

use std::fmt::{self, Display};

/// The scalar kind underlying every type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
	Void,
	Bool,
	Int,
	Uint,
	Float,
	Double,
}

impl ScalarKind {
	pub fn name(self) -> &'static str {
		match self {
			ScalarKind::Void => "void",
			ScalarKind::Bool => "bool",
			ScalarKind::Int => "int",
			ScalarKind::Uint => "uint",
			ScalarKind::Float => "float",
			ScalarKind::Double => "double",
		}
	}

	/// Whether a value of this kind implicitly converts into `target`.
	pub fn converts_to(self, target: ScalarKind) -> bool {
		use ScalarKind::*;
		match (self, target) {
			(Void, _) | (_, Void) => false,
			(from, to) if from == to => true,
			(Int, Uint | Float | Double) | (Uint, Float | Double) | (Float, Double) => true,
			_ => false,
		}
	}

	pub fn is_integer(self) -> bool { matches!(self, ScalarKind::Int | ScalarKind::Uint) }

	fn vector_prefix(self) -> &'static str {
		match self {
			ScalarKind::Bool => "b",
			ScalarKind::Int => "i",
			ScalarKind::Uint => "u",
			ScalarKind::Double => "d",
			ScalarKind::Float | ScalarKind::Void => "",
		}
	}
}

/// A structural type: scalar, vector or matrix of a scalar kind.
///
/// Matrices are stored column major, `columns` vectors of `rows` components,
/// so `mat2x3` has two columns of `vec3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
	Void,
	Scalar(ScalarKind),
	Vector { scalar: ScalarKind, length: u32 },
	Matrix { scalar: ScalarKind, columns: u32, rows: u32 },
}

impl Type {
	pub const BOOL: Type = Type::Scalar(ScalarKind::Bool);
	pub const DOUBLE: Type = Type::Scalar(ScalarKind::Double);
	pub const FLOAT: Type = Type::Scalar(ScalarKind::Float);
	pub const INT: Type = Type::Scalar(ScalarKind::Int);
	pub const UINT: Type = Type::Scalar(ScalarKind::Uint);

	pub fn scalar(scalar: ScalarKind) -> Self {
		match scalar {
			ScalarKind::Void => Type::Void,
			scalar => Type::Scalar(scalar),
		}
	}

	pub fn vector(scalar: ScalarKind, length: u32) -> Self { Type::Vector { scalar, length } }

	pub fn matrix(scalar: ScalarKind, columns: u32, rows: u32) -> Self { Type::Matrix { scalar, columns, rows } }

	pub fn scalar_kind(&self) -> ScalarKind {
		match *self {
			Type::Void => ScalarKind::Void,
			Type::Scalar(scalar) | Type::Vector { scalar, .. } | Type::Matrix { scalar, .. } => scalar,
		}
	}

	pub fn is_scalar(&self) -> bool { matches!(self, Type::Scalar(_)) }

	pub fn is_vector(&self) -> bool { matches!(self, Type::Vector { .. }) }

	pub fn is_matrix(&self) -> bool { matches!(self, Type::Matrix { .. }) }

	/// Number of scalar components a value of this type is made of.
	pub fn components(&self) -> u32 {
		match *self {
			Type::Void => 0,
			Type::Scalar(_) => 1,
			Type::Vector { length, .. } => length,
			Type::Matrix { columns, rows, .. } => columns * rows,
		}
	}

	/// The type of one column of a matrix.
	pub fn column_type(&self) -> Option<Type> {
		match *self {
			Type::Matrix { scalar, rows, .. } => Some(Type::vector(scalar, rows)),
			_ => None,
		}
	}

	/// Whether a value of this type implicitly converts into `target`.
	///
	/// The shapes have to be identical, only the scalar kind may widen.
	pub fn converts_to(&self, target: &Type) -> bool {
		let same_shape = match (*self, *target) {
			(Type::Scalar(_), Type::Scalar(_)) => true,
			(Type::Vector { length: from, .. }, Type::Vector { length: to, .. }) => from == to,
			(Type::Matrix { columns: c1, rows: r1, .. }, Type::Matrix { columns: c2, rows: r2, .. }) => {
				c1 == c2 && r1 == r2
			}
			_ => false,
		};
		same_shape && self.scalar_kind().converts_to(target.scalar_kind())
	}

	/// Looks up the type named by a type keyword such as `vec3` or `dmat2x4`.
	pub fn from_keyword(word: &str) -> Option<Self> {
		match word {
			"void" => return Some(Type::Void),
			"bool" => return Some(Type::BOOL),
			"int" => return Some(Type::INT),
			"uint" => return Some(Type::UINT),
			"float" => return Some(Type::FLOAT),
			"double" => return Some(Type::DOUBLE),
			_ => {}
		}

		const VECTORS: [(&str, ScalarKind); 5] = [
			("bvec", ScalarKind::Bool),
			("ivec", ScalarKind::Int),
			("uvec", ScalarKind::Uint),
			("dvec", ScalarKind::Double),
			("vec", ScalarKind::Float),
		];
		for (prefix, scalar) in VECTORS {
			if let Some(rest) = word.strip_prefix(prefix) {
				return dimension(rest).map(|length| Type::vector(scalar, length));
			}
		}

		let (scalar, rest) = if let Some(rest) = word.strip_prefix("dmat") {
			(ScalarKind::Double, rest)
		} else {
			(ScalarKind::Float, word.strip_prefix("mat")?)
		};
		match rest.split_once('x') {
			Some((columns, rows)) => Some(Type::matrix(scalar, dimension(columns)?, dimension(rows)?)),
			None => dimension(rest).map(|n| Type::matrix(scalar, n, n)),
		}
	}
}

/// Parses a single vector/matrix dimension digit.
fn dimension(text: &str) -> Option<u32> {
	match text {
		"2" => Some(2),
		"3" => Some(3),
		"4" => Some(4),
		_ => None,
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Type::Void => write!(f, "void"),
			Type::Scalar(scalar) => write!(f, "{}", scalar.name()),
			Type::Vector { scalar, length } => write!(f, "{}vec{length}", scalar.vector_prefix()),
			Type::Matrix { scalar, columns, rows } => {
				write!(f, "{}mat{columns}", scalar.vector_prefix())?;
				if columns != rows {
					write!(f, "x{rows}")?;
				}
				Ok(())
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scalar_promotion() {
		use ScalarKind::*;
		assert!(Int.converts_to(Float));
		assert!(Int.converts_to(Uint));
		assert!(Uint.converts_to(Double));
		assert!(Float.converts_to(Double));
		assert!(!Float.converts_to(Int));
		assert!(!Double.converts_to(Float));
		assert!(!Bool.converts_to(Int));
		assert!(!Int.converts_to(Bool));
		assert!(Bool.converts_to(Bool));
		assert!(!Void.converts_to(Void));
	}

	#[test]
	fn shape_must_match_for_conversion() {
		assert!(Type::vector(ScalarKind::Int, 3).converts_to(&Type::vector(ScalarKind::Float, 3)));
		assert!(!Type::vector(ScalarKind::Int, 3).converts_to(&Type::vector(ScalarKind::Float, 2)));
		assert!(!Type::INT.converts_to(&Type::vector(ScalarKind::Int, 2)));
		assert!(Type::matrix(ScalarKind::Float, 2, 3).converts_to(&Type::matrix(ScalarKind::Double, 2, 3)));
		assert!(!Type::matrix(ScalarKind::Float, 2, 3).converts_to(&Type::matrix(ScalarKind::Float, 3, 2)));
		assert!(!Type::Void.converts_to(&Type::Void));
	}

	#[test]
	fn keywords() {
		assert_eq!(Type::from_keyword("float"), Some(Type::FLOAT));
		assert_eq!(Type::from_keyword("vec3"), Some(Type::vector(ScalarKind::Float, 3)));
		assert_eq!(Type::from_keyword("bvec2"), Some(Type::vector(ScalarKind::Bool, 2)));
		assert_eq!(Type::from_keyword("uvec4"), Some(Type::vector(ScalarKind::Uint, 4)));
		assert_eq!(Type::from_keyword("mat3"), Some(Type::matrix(ScalarKind::Float, 3, 3)));
		assert_eq!(Type::from_keyword("mat2x4"), Some(Type::matrix(ScalarKind::Float, 2, 4)));
		assert_eq!(Type::from_keyword("dmat4x3"), Some(Type::matrix(ScalarKind::Double, 4, 3)));
		assert_eq!(Type::from_keyword("vec5"), None);
		assert_eq!(Type::from_keyword("mat"), None);
		assert_eq!(Type::from_keyword("mat2x"), None);
		assert_eq!(Type::from_keyword("vector"), None);
		assert_eq!(Type::from_keyword("color"), None);
	}

	#[test]
	fn names() {
		assert_eq!(Type::INT.to_string(), "int");
		assert_eq!(Type::vector(ScalarKind::Double, 2).to_string(), "dvec2");
		assert_eq!(Type::vector(ScalarKind::Float, 4).to_string(), "vec4");
		assert_eq!(Type::matrix(ScalarKind::Float, 2, 2).to_string(), "mat2");
		assert_eq!(Type::matrix(ScalarKind::Double, 3, 2).to_string(), "dmat3x2");
		assert_eq!(Type::Void.to_string(), "void");
	}

	#[test]
	fn components() {
		assert_eq!(Type::Void.components(), 0);
		assert_eq!(Type::BOOL.components(), 1);
		assert_eq!(Type::vector(ScalarKind::Int, 3).components(), 3);
		assert_eq!(Type::matrix(ScalarKind::Float, 2, 4).components(), 8);
		assert_eq!(Type::matrix(ScalarKind::Float, 2, 4).column_type(), Some(Type::vector(ScalarKind::Float, 4)));
	}
}
