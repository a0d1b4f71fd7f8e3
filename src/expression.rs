//! Expression trees.
//!
//! An expression is one of five node kinds, each implementing
//! [`ExpressionNode`]. Nodes live in an [`ExprArena`] and refer to their
//! children by [`ExprId`]; the arena counts references so a subtree can be
//! kept alive while the node built on top of it is thrown away.
//!
//! Types are never stored in the tree, [`ExpressionNode::return_type`]
//! recomputes them from the leaves on every call.
mod arena;
pub mod check;

use std::rc::Rc;

pub use arena::{ArenaStats, ExprArena, ExprId};
use rspirv::spirv::{Op, Word};

use crate::{
	WriteError,
	error::typecheck::{Side, TypeError},
	function::Function,
	scope::Variable,
	spirv::{Section, SpvWriter},
	types::{ScalarKind, Type},
};

/// The operations every expression node supports.
pub trait ExpressionNode {
	/// Expressions this node holds a reference to, released together with it.
	fn children(&self) -> Vec<ExprId>;

	/// Appends source text for the expression to `out`.
	fn print(&self, arena: &ExprArena, out: &mut String);

	fn return_type(&self, arena: &ExprArena) -> Result<Type, TypeError>;

	/// Whether the value is known without running the shader.
	fn is_constant(&self, arena: &ExprArena) -> bool;

	/// Emits the instructions computing the expression, returning the id
	/// holding its value.
	fn write(&self, arena: &ExprArena, writer: &mut SpvWriter) -> Result<Word, WriteError>;
}

/// Assignment operators, `=` and the compound forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
	Assign,
	Mul,
	Div,
	Mod,
	Add,
	Sub,
	LeftShift,
	RightShift,
	And,
	Xor,
	Or,
}

impl AssignOp {
	pub fn symbol(self) -> &'static str {
		match self {
			AssignOp::Assign => "=",
			AssignOp::Mul => "*=",
			AssignOp::Div => "/=",
			AssignOp::Mod => "%=",
			AssignOp::Add => "+=",
			AssignOp::Sub => "-=",
			AssignOp::LeftShift => "<<=",
			AssignOp::RightShift => ">>=",
			AssignOp::And => "&=",
			AssignOp::Xor => "^=",
			AssignOp::Or => "|=",
		}
	}
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	Mul,
	Div,
	Mod,
	Add,
	Sub,
	LeftShift,
	RightShift,
	Less,
	Greater,
	LessEqual,
	GreaterEqual,
	Equal,
	NotEqual,
	BitAnd,
	BitXor,
	BitOr,
	LogicalAnd,
	LogicalXor,
	LogicalOr,
}

impl Operator {
	pub fn symbol(self) -> &'static str {
		match self {
			Operator::Mul => "*",
			Operator::Div => "/",
			Operator::Mod => "%",
			Operator::Add => "+",
			Operator::Sub => "-",
			Operator::LeftShift => "<<",
			Operator::RightShift => ">>",
			Operator::Less => "<",
			Operator::Greater => ">",
			Operator::LessEqual => "<=",
			Operator::GreaterEqual => ">=",
			Operator::Equal => "==",
			Operator::NotEqual => "!=",
			Operator::BitAnd => "&",
			Operator::BitXor => "^",
			Operator::BitOr => "|",
			Operator::LogicalAnd => "&&",
			Operator::LogicalXor => "^^",
			Operator::LogicalOr => "||",
		}
	}

	/// Comparisons and logical operators always produce a `bool`.
	pub fn is_boolean(self) -> bool {
		matches!(
			self,
			Operator::Less
				| Operator::Greater
				| Operator::LessEqual
				| Operator::GreaterEqual
				| Operator::Equal
				| Operator::NotEqual
				| Operator::LogicalAnd
				| Operator::LogicalXor
				| Operator::LogicalOr
		)
	}

	/// Type of `left op right`, or why the operands are not accepted.
	pub fn result_type(self, left: &Type, right: &Type) -> Result<Type, TypeError> {
		match self {
			Operator::Mul => check::arithmetic(true, left, right),
			Operator::Div | Operator::Add | Operator::Sub => check::arithmetic(false, left, right),
			Operator::Mod | Operator::BitAnd | Operator::BitXor | Operator::BitOr => check::bitwise(left, right),
			Operator::LeftShift | Operator::RightShift => check::shift(left, right),
			Operator::Less | Operator::Greater | Operator::LessEqual | Operator::GreaterEqual => {
				check::relational(left, right)
			}
			Operator::Equal | Operator::NotEqual => Ok(Type::BOOL),
			Operator::LogicalAnd | Operator::LogicalXor | Operator::LogicalOr => {
				check::logical_operand(Side::Right, self.symbol(), right)?;
				check::logical_operand(Side::Left, self.symbol(), left)?;
				Ok(Type::BOOL)
			}
		}
	}
}

/// `lvalue op rvalue`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
	pub op:     AssignOp,
	pub lvalue: ExprId,
	pub rvalue: ExprId,
}

impl Assignment {
	pub fn new(op: AssignOp, lvalue: ExprId, rvalue: ExprId) -> Self { Self { op, lvalue, rvalue } }
}

impl ExpressionNode for Assignment {
	fn children(&self) -> Vec<ExprId> { vec![self.lvalue, self.rvalue] }

	fn print(&self, arena: &ExprArena, out: &mut String) {
		arena.get(self.lvalue).print(arena, out);
		out.push(' ');
		out.push_str(self.op.symbol());
		out.push(' ');
		arena.get(self.rvalue).print(arena, out);
	}

	fn return_type(&self, arena: &ExprArena) -> Result<Type, TypeError> { arena.get(self.lvalue).return_type(arena) }

	fn is_constant(&self, _arena: &ExprArena) -> bool { false }

	fn write(&self, _arena: &ExprArena, _writer: &mut SpvWriter) -> Result<Word, WriteError> {
		Err(WriteError::NotImplemented("assignment"))
	}
}

/// `left op right`
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
	pub op:    Operator,
	pub left:  ExprId,
	pub right: ExprId,
}

impl Operation {
	pub fn new(op: Operator, left: ExprId, right: ExprId) -> Self { Self { op, left, right } }
}

impl ExpressionNode for Operation {
	fn children(&self) -> Vec<ExprId> { vec![self.left, self.right] }

	fn print(&self, arena: &ExprArena, out: &mut String) {
		arena.get(self.left).print(arena, out);
		out.push(' ');
		out.push_str(self.op.symbol());
		out.push(' ');
		arena.get(self.right).print(arena, out);
	}

	fn return_type(&self, arena: &ExprArena) -> Result<Type, TypeError> {
		if self.op.is_boolean() {
			return Ok(Type::BOOL);
		}
		let left = arena.get(self.left).return_type(arena)?;
		let right = arena.get(self.right).return_type(arena)?;
		self.op.result_type(&left, &right)
	}

	fn is_constant(&self, _arena: &ExprArena) -> bool { false }

	fn write(&self, _arena: &ExprArena, _writer: &mut SpvWriter) -> Result<Word, WriteError> {
		Err(WriteError::NotImplemented("operation"))
	}
}

/// Reads a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
	pub variable: Rc<Variable>,
}

impl Reference {
	pub fn new(variable: Rc<Variable>) -> Self { Self { variable } }
}

impl ExpressionNode for Reference {
	fn children(&self) -> Vec<ExprId> { Vec::new() }

	fn print(&self, _arena: &ExprArena, out: &mut String) { out.push_str(self.variable.name()) }

	fn return_type(&self, _arena: &ExprArena) -> Result<Type, TypeError> { Ok(self.variable.ty()) }

	fn is_constant(&self, _arena: &ExprArena) -> bool { false }

	fn write(&self, _arena: &ExprArena, writer: &mut SpvWriter) -> Result<Word, WriteError> {
		let pointer = writer.get_id_for_variable(&self.variable);
		let ty = writer.get_id_for_type(&self.variable.ty());
		let id = writer.next_id();
		writer.add(Section::Code, Op::Load, 4, &[ty, id, pointer]);
		Ok(id)
	}
}

/// `function (arguments...)`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
	pub function:  Function,
	pub arguments: Vec<ExprId>,
}

impl FunctionCall {
	pub fn new(function: Function, arguments: Vec<ExprId>) -> Self { Self { function, arguments } }
}

impl ExpressionNode for FunctionCall {
	fn children(&self) -> Vec<ExprId> { self.arguments.clone() }

	fn print(&self, arena: &ExprArena, out: &mut String) {
		out.push_str(&self.function.name());
		out.push_str(" (");
		for (i, argument) in self.arguments.iter().enumerate() {
			if i > 0 {
				out.push_str(", ");
			}
			arena.get(*argument).print(arena, out);
		}
		out.push(')');
	}

	fn return_type(&self, _arena: &ExprArena) -> Result<Type, TypeError> { Ok(self.function.return_type()) }

	fn is_constant(&self, _arena: &ExprArena) -> bool { false }

	fn write(&self, _arena: &ExprArena, _writer: &mut SpvWriter) -> Result<Word, WriteError> {
		Err(WriteError::NotImplemented("function call"))
	}
}

/// A literal scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
	Int(i32),
	Uint(u32),
	Float(f32),
	Double(f64),
	Bool(bool),
}

impl Constant {
	pub fn scalar_kind(&self) -> ScalarKind {
		match self {
			Constant::Int(_) => ScalarKind::Int,
			Constant::Uint(_) => ScalarKind::Uint,
			Constant::Float(_) => ScalarKind::Float,
			Constant::Double(_) => ScalarKind::Double,
			Constant::Bool(_) => ScalarKind::Bool,
		}
	}
}

/// Float literals always carry a decimal point so they read back as floats.
fn float_text(mut text: String) -> String {
	if text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
		text.push_str(".0");
	}
	text
}

impl ExpressionNode for Constant {
	fn children(&self) -> Vec<ExprId> { Vec::new() }

	fn print(&self, _arena: &ExprArena, out: &mut String) {
		match self {
			// No unary minus, negative values come from literals above `i32::MAX`.
			Constant::Int(value) => out.push_str(&(*value as u32).to_string()),
			Constant::Uint(value) => out.push_str(&format!("{value}u")),
			Constant::Float(value) => out.push_str(&float_text(value.to_string())),
			Constant::Double(value) => out.push_str(&format!("{}lf", float_text(value.to_string()))),
			Constant::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
		}
	}

	fn return_type(&self, _arena: &ExprArena) -> Result<Type, TypeError> { Ok(Type::scalar(self.scalar_kind())) }

	fn is_constant(&self, _arena: &ExprArena) -> bool { true }

	fn write(&self, _arena: &ExprArena, writer: &mut SpvWriter) -> Result<Word, WriteError> {
		let ty = writer.get_id_for_type(&Type::scalar(self.scalar_kind()));
		let id = writer.next_id();
		match *self {
			Constant::Int(value) => writer.add(Section::Declare, Op::Constant, 4, &[ty, id, value as Word]),
			Constant::Uint(value) => writer.add(Section::Declare, Op::Constant, 4, &[ty, id, value]),
			Constant::Float(value) => writer.add(Section::Declare, Op::Constant, 4, &[ty, id, value.to_bits()]),
			Constant::Double(value) => {
				let bits = value.to_bits();
				writer.add(Section::Declare, Op::Constant, 5, &[ty, id, bits as Word, (bits >> 32) as Word]);
			}
			Constant::Bool(true) => writer.add(Section::Declare, Op::ConstantTrue, 3, &[ty, id]),
			Constant::Bool(false) => writer.add(Section::Declare, Op::ConstantFalse, 3, &[ty, id]),
		}
		Ok(id)
	}
}

/// Any expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
	Assignment(Assignment),
	Operation(Operation),
	Reference(Reference),
	FunctionCall(FunctionCall),
	Constant(Constant),
}

impl Expression {
	fn node(&self) -> &dyn ExpressionNode {
		match self {
			Expression::Assignment(node) => node,
			Expression::Operation(node) => node,
			Expression::Reference(node) => node,
			Expression::FunctionCall(node) => node,
			Expression::Constant(node) => node,
		}
	}
}

impl ExpressionNode for Expression {
	fn children(&self) -> Vec<ExprId> { self.node().children() }

	fn print(&self, arena: &ExprArena, out: &mut String) { self.node().print(arena, out) }

	fn return_type(&self, arena: &ExprArena) -> Result<Type, TypeError> { self.node().return_type(arena) }

	fn is_constant(&self, arena: &ExprArena) -> bool { self.node().is_constant(arena) }

	fn write(&self, arena: &ExprArena, writer: &mut SpvWriter) -> Result<Word, WriteError> {
		self.node().write(arena, writer)
	}
}

impl From<Assignment> for Expression {
	fn from(node: Assignment) -> Self { Expression::Assignment(node) }
}

impl From<Operation> for Expression {
	fn from(node: Operation) -> Self { Expression::Operation(node) }
}

impl From<Reference> for Expression {
	fn from(node: Reference) -> Self { Expression::Reference(node) }
}

impl From<FunctionCall> for Expression {
	fn from(node: FunctionCall) -> Self { Expression::FunctionCall(node) }
}

impl From<Constant> for Expression {
	fn from(node: Constant) -> Self { Expression::Constant(node) }
}

impl ExprArena {
	/// Source text of the expression `id`.
	pub fn print(&self, id: ExprId) -> String {
		let mut out = String::new();
		self.get(id).print(self, &mut out);
		out
	}

	pub fn return_type(&self, id: ExprId) -> Result<Type, TypeError> { self.get(id).return_type(self) }

	pub fn is_constant(&self, id: ExprId) -> bool { self.get(id).is_constant(self) }

	pub fn write(&self, id: ExprId, writer: &mut SpvWriter) -> Result<Word, WriteError> { self.get(id).write(self, writer) }
}

#[cfg(test)]
mod tests {
	use rspirv::dr::{Operand, load_words};

	use super::*;

	fn constant(arena: &mut ExprArena, value: Constant) -> ExprId { arena.alloc(value.into()) }

	fn reference(arena: &mut ExprArena, name: &str, ty: Type) -> ExprId {
		arena.alloc(Reference::new(Variable::new(name, ty)).into())
	}

	#[test]
	fn print_constants() {
		let mut arena = ExprArena::new();
		let cases = [
			(Constant::Int(42), "42"),
			(Constant::Int(-1), "4294967295"),
			(Constant::Int(i32::MIN), "2147483648"),
			(Constant::Uint(7), "7u"),
			(Constant::Float(1.0), "1.0"),
			(Constant::Float(0.25), "0.25"),
			(Constant::Double(2.0), "2.0lf"),
			(Constant::Double(0.5), "0.5lf"),
			(Constant::Bool(true), "true"),
			(Constant::Bool(false), "false"),
		];
		for (value, text) in cases {
			let id = constant(&mut arena, value);
			assert_eq!(arena.print(id), text);
		}
	}

	#[test]
	fn print_trees() {
		let mut arena = ExprArena::new();
		let a = reference(&mut arena, "a", Type::FLOAT);
		let one = constant(&mut arena, Constant::Float(1.0));
		let sum = arena.alloc(Operation::new(Operator::Add, a, one).into());
		let b = reference(&mut arena, "b", Type::FLOAT);
		let assign = arena.alloc(Assignment::new(AssignOp::Mul, b, sum).into());
		assert_eq!(arena.print(assign), "b *= a + 1.0");

		let x = constant(&mut arena, Constant::Int(1));
		let y = constant(&mut arena, Constant::Float(2.0));
		let function = Function::constructor(Type::vector(ScalarKind::Float, 2));
		let call = arena.alloc(FunctionCall::new(function.clone(), vec![x, y]).into());
		assert_eq!(arena.print(call), "vec2 (1, 2.0)");

		let empty = arena.alloc(FunctionCall::new(function, Vec::new()).into());
		assert_eq!(arena.print(empty), "vec2 ()");
	}

	#[test]
	fn return_types() {
		let mut arena = ExprArena::new();
		let v = reference(&mut arena, "v", Type::vector(ScalarKind::Float, 3));
		let two = constant(&mut arena, Constant::Int(2));
		let scaled = arena.alloc(Operation::new(Operator::Mul, v, two).into());
		assert_eq!(arena.return_type(scaled), Ok(Type::vector(ScalarKind::Float, 3)));

		let flag = reference(&mut arena, "flag", Type::BOOL);
		let three = constant(&mut arena, Constant::Int(3));
		let less = arena.alloc(Operation::new(Operator::Less, flag, three).into());
		assert_eq!(arena.return_type(less), Ok(Type::BOOL));

		let i = reference(&mut arena, "i", Type::INT);
		let f = constant(&mut arena, Constant::Float(1.0));
		let assign = arena.alloc(Assignment::new(AssignOp::Assign, i, f).into());
		assert_eq!(arena.return_type(assign), Ok(Type::INT));
	}

	#[test]
	fn return_type_of_mismatched_operands() {
		let mut arena = ExprArena::new();
		let left = constant(&mut arena, Constant::Bool(true));
		let right = constant(&mut arena, Constant::Int(1));
		let sum = arena.alloc(Operation::new(Operator::Add, left, right).into());
		assert_eq!(arena.return_type(sum), Err(TypeError::IncompatibleScalars { left: Type::BOOL, right: Type::INT }));
	}

	#[test]
	fn only_constants_are_constant() {
		let mut arena = ExprArena::new();
		let one = constant(&mut arena, Constant::Int(1));
		let two = constant(&mut arena, Constant::Int(2));
		let sum = arena.alloc(Operation::new(Operator::Add, one, two).into());
		let x = reference(&mut arena, "x", Type::INT);
		assert!(arena.is_constant(one));
		assert!(!arena.is_constant(sum));
		assert!(!arena.is_constant(x));
	}

	#[test]
	fn write_constants() {
		let mut arena = ExprArena::new();
		let mut writer = SpvWriter::new();
		let int = constant(&mut arena, Constant::Int(-1));
		let double = constant(&mut arena, Constant::Double(1.5));
		let yes = constant(&mut arena, Constant::Bool(true));

		let int_id = arena.write(int, &mut writer).unwrap();
		let double_id = arena.write(double, &mut writer).unwrap();
		let yes_id = arena.write(yes, &mut writer).unwrap();
		assert!(int_id < double_id && double_id < yes_id);
		assert_eq!(writer.section_len(Section::Code), 0);

		let module = load_words(writer.finish()).unwrap();
		let find = |id| module.types_global_values.iter().find(|inst| inst.result_id == Some(id)).unwrap();
		assert_eq!(find(int_id).operands, vec![Operand::LiteralInt32(u32::MAX)]);
		assert_eq!(find(double_id).operands, vec![Operand::LiteralFloat64(1.5)]);
		assert_eq!(find(yes_id).class.opcode, Op::ConstantTrue);
	}

	#[test]
	fn write_reference_loads() {
		let mut arena = ExprArena::new();
		let mut writer = SpvWriter::new();
		let x = reference(&mut arena, "x", Type::UINT);
		let id = arena.write(x, &mut writer).unwrap();
		assert_eq!(writer.section_len(Section::Code), 4);

		let module = load_words(writer.finish()).unwrap();
		let load = &module.functions[0].blocks[0].instructions[0];
		assert_eq!(load.class.opcode, Op::Load);
		assert_eq!(load.result_id, Some(id));
	}

	#[test]
	fn unsupported_writes_are_errors() {
		let mut arena = ExprArena::new();
		let mut writer = SpvWriter::new();
		let one = constant(&mut arena, Constant::Int(1));
		let two = constant(&mut arena, Constant::Int(2));
		let sum = arena.alloc(Operation::new(Operator::Add, one, two).into());
		assert_eq!(arena.write(sum, &mut writer), Err(WriteError::NotImplemented("operation")));
	}
}
