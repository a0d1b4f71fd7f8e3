//! # How shader text becomes SPIR-V
//!
//! User's source code: `vec3 color; color * 0.5;`

//! ## Scanning
//!
//! The scanner turns characters into tokens. Type names such as `vec3` and
//! `dmat2x4` are keywords, numbers carry their literal type: `1` is an `int`,
//! `1u` a `uint`, `1.0` a `float` and `1.0lf` a `double`.
//!
//! Whitespaces and comments are ignored. So the tokens are
//! `["vec3", "color", ";", "color", "*", "0.5", ";"]`.

//! ## Parsing and type checking
//!
//! The parser builds expression trees and checks every operator the moment
//! its operands are known. `color * 0.5` is a `vec3` because a scalar is
//! broadcast over a vector, `color * true` is reported and dropped.
//!
//! ``` markdown
//! * (Operation) : vec3
//! ├── color (Reference) : vec3
//! └── 0.5 (Constant) : float
//! ```
//!
//! Parsing never stops at the first error. Each problem is recorded as a
//! `Diagnostic` and the parser continues with what survived, so one pass
//! reports every mistake of a statement.

//! ## Code generation
//!
//! Expressions are lowered into a SPIR-V module. Every value gets a result id,
//! types and variables are declared once and shared by everything using them.
//! Constants and variable reads can be emitted, everything else is rejected
//! with an error instead of producing a wrong module.

pub mod cli;
pub mod compiler;
mod error;
pub mod expression;
pub mod function;
pub mod parser;
pub mod scanner;
pub mod scope;
pub mod spirv;
pub mod types;

pub use compiler::{Compiled, Compiler};
pub use error::{
	SlError,
	codegen::WriteError,
	parser::Diagnostic,
	scanner::{ScanError, ScanErrorType, ScannerError},
	typecheck::{Side, TypeError},
};
