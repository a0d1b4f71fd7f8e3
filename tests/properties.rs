use proptest::prelude::*;
use slc::{
	expression::{Constant, ExprArena},
	parser::Parser,
	scanner::{Scanner, TokenType},
	scope::{Scope, Variable},
	types::{ScalarKind, Type},
};

const MAX_OPERATIONS: usize = 8;
const MAX_FRAGMENTS: usize = 32;

/// Fragments that glue into valid and invalid statements alike.
const FRAGMENTS: &[&str] = &[
	"a", "v", "n", "flag", "missing", "1", "2u", "0.5", "1.0lf", "true", "+", "-", "*", "/", "%", "<<", "&", "|", "^",
	"&&", "||", "^^", "==", "<", "=", "+=", "vec3(", "mat2(", "float(", ",", ")", ";", "float b", "void c",
];

fn scope() -> Scope {
	let mut scope = Scope::new();
	for (name, ty) in [
		("a", Type::FLOAT),
		("n", Type::INT),
		("v", Type::vector(ScalarKind::Float, 3)),
		("flag", Type::BOOL),
	] {
		let _ = scope.declare(Variable::new(name, ty));
	}
	scope
}

fn operand() -> impl Strategy<Value = String> {
	prop_oneof![
		Just("a".to_string()),
		Just("n".to_string()),
		(0u16..1000).prop_map(|value| value.to_string()),
		(0u16..1000, 0u8..100).prop_map(|(whole, fraction)| format!("{whole}.{fraction}")),
	]
}

fn operator() -> impl Strategy<Value = &'static str> { prop_oneof![Just("+"), Just("-"), Just("*"), Just("/")] }

fn numeric_type() -> impl Strategy<Value = Type> {
	let kind = prop_oneof![
		Just(ScalarKind::Bool),
		Just(ScalarKind::Int),
		Just(ScalarKind::Uint),
		Just(ScalarKind::Float),
		Just(ScalarKind::Double),
	];
	(kind, 1u32..=4).prop_map(|(kind, length)| if length == 1 { Type::scalar(kind) } else { Type::vector(kind, length) })
}

/// Every non-negative finite `f32`, the bit patterns below positive infinity.
fn positive_finite_f32() -> impl Strategy<Value = f32> { (0u32..f32::INFINITY.to_bits()).prop_map(f32::from_bits) }

fn positive_finite_f64() -> impl Strategy<Value = f64> { (0u64..f64::INFINITY.to_bits()).prop_map(f64::from_bits) }

/// Parses one expression and returns its printed form and type.
fn reparse(source: &str) -> (String, Type) {
	let mut scope = scope();
	let mut arena = ExprArena::new();
	let tokens = Scanner::new(source).scan_tokens().unwrap();
	let mut parser = Parser::new(tokens, &mut scope, &mut arena);
	let id = parser.parse_expression().unwrap();
	assert!(parser.finish().is_empty(), "diagnostics for {source}");
	(arena.print(id), arena.return_type(id).unwrap())
}

proptest! {
	#[test]
	fn printing_is_a_fixed_point(
		first in operand(),
		rest in proptest::collection::vec((operator(), operand()), 0..=MAX_OPERATIONS)
	) {
		let mut source = first;
		for (operator, operand) in rest {
			source.push_str(&format!(" {operator} {operand}"));
		}

		let (printed, ty) = reparse(&source);
		let (reprinted, retyped) = reparse(&printed);
		prop_assert_eq!(&printed, &reprinted);
		prop_assert_eq!(ty, retyped);
	}

	#[test]
	fn compiling_frees_every_expression(
		picks in proptest::collection::vec(0..FRAGMENTS.len(), 0..=MAX_FRAGMENTS)
	) {
		let source = picks.iter().map(|&index| FRAGMENTS[index]).collect::<Vec<_>>().join(" ");
		let mut scope = scope();
		let mut arena = ExprArena::new();
		let tokens = Scanner::new(&source).scan_tokens().unwrap();
		let parsed = Parser::new(tokens, &mut scope, &mut arena).parse_program();

		for statement in &parsed.statements {
			if let slc::parser::Statement::Expression(id) = statement {
				arena.release(*id);
			}
		}
		let stats = arena.stats();
		prop_assert_eq!(stats.live(), 0, "leaked expressions for {}", source);
	}

	#[test]
	fn arithmetic_is_symmetric_for_addition(left in numeric_type(), right in numeric_type()) {
		let forward = slc::expression::check::arithmetic(false, &left, &right).ok();
		let backward = slc::expression::check::arithmetic(false, &right, &left).ok();
		prop_assert_eq!(forward, backward);
	}

	#[test]
	fn conversion_is_transitive(a in numeric_type(), b in numeric_type(), c in numeric_type()) {
		prop_assert!(a.converts_to(&a));
		if a.converts_to(&b) && b.converts_to(&c) {
			prop_assert!(a.converts_to(&c));
		}
	}

	#[test]
	fn printed_literals_scan_back(
		int in any::<i32>(),
		uint in any::<u32>(),
		float in positive_finite_f32(),
		double in positive_finite_f64()
	) {
		let mut arena = ExprArena::new();
		let constants = [Constant::Int(int), Constant::Uint(uint), Constant::Float(float), Constant::Double(double)];
		let printed: Vec<String> = constants.iter().map(|&constant| {
			let id = arena.alloc(constant.into());
			arena.print(id)
		}).collect();

		let source = printed.join(" ");
		let tokens = Scanner::new(&source).scan_tokens().unwrap();
		let scanned: Vec<TokenType> = tokens.into_iter().map(|token| token.r#type).collect();
		prop_assert_eq!(scanned, vec![
			TokenType::IntConstant(int),
			TokenType::UintConstant(uint),
			TokenType::FloatConstant(float),
			TokenType::DoubleConstant(double),
			TokenType::Eof,
		]);
	}
}
