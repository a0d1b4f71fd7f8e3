use palc::Parser;
use slc::{cli::*, compiler::print_compiled};

fn main() {
	init_logging();
	let mut compiler = slc::Compiler::new();

	match Cli::parse().mode {
		Mode::File { path } => match compiler.compile_file(&path) {
			Ok(compiled) => print_compiled(&compiled),
			Err(e) => eprintln!("Failed compile file: {e}"),
		},
		Mode::Disassemble { path } => match compiler.compile_file(&path).and_then(|compiled| compiled.disassemble()) {
			Ok(text) => println!("{text}"),
			Err(e) => eprintln!("Failed disassemble file: {e}"),
		},
		Mode::Repl => compiler.run_prompt(),
	}
}
