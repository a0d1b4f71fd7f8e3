use std::{
	collections::HashMap,
	fmt::{self, Display},
	rc::Rc,
	sync::atomic::{AtomicU32, Ordering},
};

use crate::types::Type;

/// Process wide unique identity of a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u32);

impl VariableId {
	fn next() -> Self {
		static NEXT: AtomicU32 = AtomicU32::new(0);
		VariableId(NEXT.fetch_add(1, Ordering::Relaxed))
	}
}

/// A named, typed storage location.
///
/// Variables are shared between the scope that declared them and every
/// reference expression naming them.
#[derive(Debug, PartialEq)]
pub struct Variable {
	id:   VariableId,
	name: String,
	ty:   Type,
}

impl Variable {
	pub fn new(name: impl Into<String>, ty: Type) -> Rc<Self> {
		Rc::new(Self { id: VariableId::next(), name: name.into(), ty })
	}

	pub fn id(&self) -> VariableId { self.id }

	pub fn name(&self) -> &str { &self.name }

	pub fn ty(&self) -> Type { self.ty }
}

impl Display for Variable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} {}", self.ty, self.name) }
}

/// Name to variable bindings of a program.
#[derive(Default, Debug)]
pub struct Scope {
	variables: HashMap<String, Rc<Variable>>,
}

impl Scope {
	pub fn new() -> Self { Self::default() }

	/// Declares a variable, returning the existing one if the name is taken.
	pub fn declare(&mut self, variable: Rc<Variable>) -> Result<(), Rc<Variable>> {
		if let Some(existing) = self.variables.get(variable.name()) {
			return Err(existing.clone());
		}
		log::trace!("declare {variable}");
		self.variables.insert(variable.name().to_string(), variable);
		Ok(())
	}

	pub fn lookup(&self, name: &str) -> Option<Rc<Variable>> {
		self.variables.get(name).cloned()
	}

	pub fn len(&self) -> usize { self.variables.len() }

	pub fn is_empty(&self) -> bool { self.variables.is_empty() }
}
