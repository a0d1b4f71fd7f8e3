use std::{fs::read_to_string, io::Write, path::Path};

use anyhow::{Context, anyhow};
use rspirv::binary::Disassemble;

use crate::{
	SlError,
	expression::{ExprArena, ExprId},
	parser::{Parser, Statement},
	scanner::Scanner,
	scope::Scope,
	spirv::SpvWriter,
};

/// Result of compiling a piece of source.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
	/// One line per statement: the statement as parsed and its type.
	pub listing: Vec<String>,
	/// The SPIR-V module.
	pub words:   Vec<u32>,
}

impl Compiled {
	/// Human readable form of the module.
	pub fn disassemble(&self) -> Result<String, SlError> {
		let module =
			rspirv::dr::load_words(&self.words).map_err(|e| anyhow!("Failed to load emitted module: {e}"))?;
		Ok(module.disassemble())
	}
}

/// Compiler is the driver from source text to SPIR-V.
///
/// Declarations persist between calls to [`Compiler::compile`], so a REPL can
/// declare a variable on one line and use it on the next. Expressions live
/// only as long as the compile that parsed them.
#[derive(Default)]
pub struct Compiler {
	scope: Scope,
}

impl Compiler {
	pub fn new() -> Self { Self::default() }

	/// Compile a source file.
	pub fn compile_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Compiled, SlError> {
		let source = read_to_string(path).context("Failed open source file")?;
		self.compile(&source)
	}

	/// Compile statements into a module.
	pub fn compile(&mut self, source: &str) -> Result<Compiled, SlError> {
		self.compile_in(source, &mut ExprArena::new())
	}

	fn compile_in(&mut self, source: &str, arena: &mut ExprArena) -> Result<Compiled, SlError> {
		let tokens = Scanner::new(source).scan_tokens()?;
		let parsed = Parser::new(tokens, &mut self.scope, arena).parse_program();

		let result = if parsed.diagnostics.is_empty() {
			lower(arena, &parsed.statements)
		} else {
			Err(SlError::ParseErrors(parsed.diagnostics))
		};

		for statement in &parsed.statements {
			if let Statement::Expression(id) = statement {
				arena.release(*id);
			}
		}
		log::trace!("{} expressions alive after compiling", arena.stats().live());
		result
	}

	/// Run the REPL prompt.
	pub fn run_prompt(&mut self) {
		let mut input = String::new();
		let stdin = std::io::stdin();
		loop {
			input.clear();
			print!("> ");
			if let Err(e) = std::io::stdout().flush() {
				eprintln!("Failed flush: {e}");
			}
			match stdin.read_line(&mut input) {
				Ok(0) => {
					println!("\nExited slc repl");
					break;
				}
				Ok(_) => {}
				Err(e) => {
					eprintln!("Failed read line: {e}");
					continue;
				}
			}
			match self.compile(input.trim()) {
				Ok(compiled) => print_compiled(&compiled),
				Err(e) => eprintln!("Failed compile prompt: {e}"),
			}
		}
	}
}

fn lower(arena: &ExprArena, statements: &[Statement]) -> Result<Compiled, SlError> {
	let mut writer = SpvWriter::new();
	let mut listing = Vec::with_capacity(statements.len());
	for statement in statements {
		match statement {
			Statement::Declaration(variable) => {
				writer.get_id_for_variable(variable);
				listing.push(format!("{variable};"));
			}
			Statement::Expression(id) => listing.push(lower_expression(arena, *id, &mut writer)?),
		}
	}
	Ok(Compiled { listing, words: writer.finish() })
}

fn lower_expression(arena: &ExprArena, id: ExprId, writer: &mut SpvWriter) -> Result<String, SlError> {
	let text = arena.print(id);
	let ty = arena.return_type(id).with_context(|| format!("Failed to type `{text}`"))?;
	let result = arena.write(id, writer)?;
	log::debug!("{text} => %{result}");
	Ok(format!("{text}; // {ty}"))
}

/// Prints the listing followed by the module words.
pub fn print_compiled(compiled: &Compiled) {
	for line in &compiled.listing {
		println!("{line}");
	}
	for chunk in compiled.words.chunks(8) {
		let words: Vec<String> = chunk.iter().map(|word| format!("{word:08x}")).collect();
		println!("{}", words.join(" "));
	}
}
