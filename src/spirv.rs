//! SPIR-V module writer.
//!
//! Instructions are appended to one of four sections which are concatenated
//! in order when the module is finished:
//!
//! |Section|Contents
//! --|--
//! Header|`OpCapability`, `OpMemoryModel`
//! Debug|`OpName`
//! Declare|types, constants, global variables
//! Code|instructions executed by the shader
//!
//! Result ids are handed out sequentially starting at 1, every type and
//! variable is declared exactly once.
use std::collections::HashMap;

use rspirv::{
	binary::Assemble,
	dr::{ModuleHeader, Operand},
	spirv::{AddressingModel, Capability, FunctionControl, MemoryModel, Op, StorageClass, Word},
};

use crate::{
	scope::{Variable, VariableId},
	types::{ScalarKind, Type},
};

/// Modules target SPIR-V 1.0.
const VERSION: (u8, u8) = (1, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
	Header,
	Debug,
	Declare,
	Code,
}

impl Section {
	const ALL: [Section; 4] = [Section::Header, Section::Debug, Section::Declare, Section::Code];

	fn index(self) -> usize { self as usize }
}

pub struct SpvWriter {
	sections:      [Vec<Word>; 4],
	last_id:       Word,
	types:         HashMap<Type, Word>,
	pointer_types: HashMap<(StorageClass, Type), Word>,
	variables:     HashMap<VariableId, Word>,
}

impl Default for SpvWriter {
	fn default() -> Self { Self::new() }
}

impl SpvWriter {
	pub fn new() -> Self {
		let mut writer = Self {
			sections:      Default::default(),
			last_id:       0,
			types:         HashMap::new(),
			pointer_types: HashMap::new(),
			variables:     HashMap::new(),
		};
		writer.add(Section::Header, Op::Capability, 2, &[Capability::Shader as Word]);
		writer.add(Section::Header, Op::MemoryModel, 3, &[AddressingModel::Logical as Word, MemoryModel::GLSL450 as Word]);
		writer
	}

	/// Allocates a fresh result id.
	pub fn next_id(&mut self) -> Word {
		self.last_id += 1;
		self.last_id
	}

	/// Appends one instruction to `section`.
	///
	/// # Panics
	///
	/// If `word_count` does not account for the opcode word plus every operand.
	pub fn add(&mut self, section: Section, op: Op, word_count: u16, operands: &[Word]) {
		assert_eq!(
			word_count as usize,
			operands.len() + 1,
			"word count of {op:?} does not match its {} operands",
			operands.len()
		);
		let words = &mut self.sections[section.index()];
		words.push(((word_count as Word) << 16) | op as Word);
		words.extend_from_slice(operands);
	}

	/// Returns the id declaring `ty`, declaring it and its component types
	/// first if necessary.
	pub fn get_id_for_type(&mut self, ty: &Type) -> Word {
		if let Some(&id) = self.types.get(ty) {
			return id;
		}

		let id = match *ty {
			Type::Void | Type::Scalar(ScalarKind::Void) => {
				let id = self.next_id();
				self.add(Section::Declare, Op::TypeVoid, 2, &[id]);
				id
			}
			Type::Scalar(ScalarKind::Bool) => {
				let id = self.next_id();
				self.add(Section::Declare, Op::TypeBool, 2, &[id]);
				id
			}
			Type::Scalar(ScalarKind::Int) => {
				let id = self.next_id();
				self.add(Section::Declare, Op::TypeInt, 4, &[id, 32, 1]);
				id
			}
			Type::Scalar(ScalarKind::Uint) => {
				let id = self.next_id();
				self.add(Section::Declare, Op::TypeInt, 4, &[id, 32, 0]);
				id
			}
			Type::Scalar(ScalarKind::Float) => {
				let id = self.next_id();
				self.add(Section::Declare, Op::TypeFloat, 3, &[id, 32]);
				id
			}
			Type::Scalar(ScalarKind::Double) => {
				let id = self.next_id();
				self.add(Section::Declare, Op::TypeFloat, 3, &[id, 64]);
				id
			}
			Type::Vector { scalar, length } => {
				let component = self.get_id_for_type(&Type::scalar(scalar));
				let id = self.next_id();
				self.add(Section::Declare, Op::TypeVector, 4, &[id, component, length]);
				id
			}
			Type::Matrix { scalar, columns, rows } => {
				let column = self.get_id_for_type(&Type::vector(scalar, rows));
				let id = self.next_id();
				self.add(Section::Declare, Op::TypeMatrix, 4, &[id, column, columns]);
				id
			}
		};

		log::trace!("declared type {ty} as %{id}");
		self.types.insert(*ty, id);
		id
	}

	fn get_id_for_pointer_type(&mut self, storage: StorageClass, ty: &Type) -> Word {
		if let Some(&id) = self.pointer_types.get(&(storage, *ty)) {
			return id;
		}
		let pointee = self.get_id_for_type(ty);
		let id = self.next_id();
		self.add(Section::Declare, Op::TypePointer, 4, &[id, storage as Word, pointee]);
		self.pointer_types.insert((storage, *ty), id);
		id
	}

	/// Returns the id of the global variable backing `variable`, declaring
	/// and naming it on first use.
	pub fn get_id_for_variable(&mut self, variable: &Variable) -> Word {
		if let Some(&id) = self.variables.get(&variable.id()) {
			return id;
		}

		let pointer = self.get_id_for_pointer_type(StorageClass::Private, &variable.ty());
		let id = self.next_id();
		self.add(Section::Declare, Op::Variable, 4, &[pointer, id, StorageClass::Private as Word]);

		let mut operands = vec![id];
		Operand::LiteralString(variable.name().into()).assemble_into(&mut operands);
		self.add(Section::Debug, Op::Name, operands.len() as u16 + 1, &operands);

		log::trace!("declared variable {variable} as %{id}");
		self.variables.insert(variable.id(), id);
		id
	}

	/// Number of instructions words written to `section` so far.
	pub fn section_len(&self, section: Section) -> usize { self.sections[section.index()].len() }

	/// Assembles the module.
	///
	/// Code is wrapped into a `void` function with a single block, a module
	/// without code only carries its declarations.
	pub fn finish(mut self) -> Vec<Word> {
		if !self.sections[Section::Code.index()].is_empty() {
			let code = std::mem::take(&mut self.sections[Section::Code.index()]);
			let void = self.get_id_for_type(&Type::Void);
			let function_type = self.next_id();
			self.add(Section::Declare, Op::TypeFunction, 3, &[function_type, void]);

			let function = self.next_id();
			let label = self.next_id();
			self.add(Section::Code, Op::Function, 5, &[void, function, FunctionControl::NONE.bits(), function_type]);
			self.add(Section::Code, Op::Label, 2, &[label]);
			self.sections[Section::Code.index()].extend(code);
			self.add(Section::Code, Op::Return, 1, &[]);
			self.add(Section::Code, Op::FunctionEnd, 1, &[]);
		}

		let bound = self.last_id + 1;
		let mut header = ModuleHeader::new(bound);
		header.set_version(VERSION.0, VERSION.1);
		let mut words = header.assemble();
		for section in Section::ALL {
			words.extend_from_slice(&self.sections[section.index()]);
		}
		log::debug!("assembled module of {} words, id bound {bound}", words.len());
		words
	}
}

#[cfg(test)]
mod tests {
	use rspirv::{dr::load_words, spirv::MAGIC_NUMBER};

	use super::*;

	#[test]
	fn empty_module_loads() {
		let words = SpvWriter::new().finish();
		assert_eq!(words[0], MAGIC_NUMBER);

		let module = load_words(&words).unwrap();
		let header = module.header.as_ref().unwrap();
		assert_eq!(header.version(), VERSION);
		assert_eq!(header.bound, 1);
		assert_eq!(module.capabilities.len(), 1);
		assert!(module.memory_model.is_some());
		assert!(module.functions.is_empty());
	}

	#[test]
	fn ids_start_at_one_and_increase() {
		let mut writer = SpvWriter::new();
		assert_eq!(writer.next_id(), 1);
		assert_eq!(writer.next_id(), 2);
		assert_eq!(writer.next_id(), 3);
	}

	#[test]
	fn types_are_interned() {
		let mut writer = SpvWriter::new();
		let mat = Type::matrix(ScalarKind::Float, 3, 2);
		let id = writer.get_id_for_type(&mat);
		// float, vec2, mat3x2
		assert_eq!(id, 3);
		assert_eq!(writer.get_id_for_type(&mat), id);
		assert_eq!(writer.get_id_for_type(&Type::FLOAT), 1);
		assert_eq!(writer.get_id_for_type(&Type::vector(ScalarKind::Float, 2)), 2);

		let module = load_words(writer.finish()).unwrap();
		let opcodes: Vec<Op> = module.types_global_values.iter().map(|inst| inst.class.opcode).collect();
		assert_eq!(opcodes, vec![Op::TypeFloat, Op::TypeVector, Op::TypeMatrix]);
		assert_eq!(module.types_global_values[2].operands, vec![Operand::IdRef(2), Operand::LiteralInt32(3)]);
	}

	#[test]
	fn scalar_declarations() {
		let mut writer = SpvWriter::new();
		for ty in [Type::BOOL, Type::INT, Type::UINT, Type::FLOAT, Type::DOUBLE, Type::Void] {
			writer.get_id_for_type(&ty);
		}
		let module = load_words(writer.finish()).unwrap();
		let operands: Vec<_> = module.types_global_values.iter().map(|inst| inst.operands.clone()).collect();
		assert_eq!(operands, vec![
			vec![],
			vec![Operand::LiteralInt32(32), Operand::LiteralInt32(1)],
			vec![Operand::LiteralInt32(32), Operand::LiteralInt32(0)],
			vec![Operand::LiteralInt32(32)],
			vec![Operand::LiteralInt32(64)],
			vec![],
		]);
	}

	#[test]
	fn variables_are_declared_once_and_named() {
		let mut writer = SpvWriter::new();
		let variable = Variable::new("color", Type::vector(ScalarKind::Float, 4));
		let id = writer.get_id_for_variable(&variable);
		assert_eq!(writer.get_id_for_variable(&variable), id);

		let module = load_words(writer.finish()).unwrap();
		assert_eq!(module.debug_names.len(), 1);
		assert_eq!(module.debug_names[0].operands, vec![Operand::IdRef(id), Operand::LiteralString("color".into())]);
		let declaration = module.types_global_values.last().unwrap();
		assert_eq!(declaration.class.opcode, Op::Variable);
		assert_eq!(declaration.result_id, Some(id));
		assert_eq!(declaration.operands, vec![Operand::StorageClass(StorageClass::Private)]);
	}

	#[test]
	fn names_filling_whole_words_stay_terminated() {
		let mut writer = SpvWriter::new();
		let id = writer.get_id_for_variable(&Variable::new("abcd", Type::BOOL));
		// opcode, target, "abcd", terminating nul word
		assert_eq!(writer.section_len(Section::Debug), 4);

		let module = load_words(writer.finish()).unwrap();
		assert_eq!(module.debug_names[0].operands, vec![Operand::IdRef(id), Operand::LiteralString("abcd".into())]);
	}

	#[test]
	fn code_is_wrapped_in_a_function() {
		let mut writer = SpvWriter::new();
		let variable = Variable::new("x", Type::INT);
		let pointer = writer.get_id_for_variable(&variable);
		let int = writer.get_id_for_type(&Type::INT);
		let id = writer.next_id();
		writer.add(Section::Code, Op::Load, 4, &[int, id, pointer]);
		assert_eq!(writer.section_len(Section::Code), 4);

		let module = load_words(writer.finish()).unwrap();
		assert_eq!(module.functions.len(), 1);
		let block = &module.functions[0].blocks[0];
		let opcodes: Vec<Op> = block.instructions.iter().map(|inst| inst.class.opcode).collect();
		assert_eq!(opcodes, vec![Op::Load, Op::Return]);
		assert_eq!(block.instructions[0].result_id, Some(id));
	}

	#[test]
	#[should_panic]
	fn word_count_must_match() {
		SpvWriter::new().add(Section::Declare, Op::TypeBool, 3, &[1]);
	}
}
