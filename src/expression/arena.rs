use std::fmt::{self, Display};

use super::{Expression, ExpressionNode};

/// Handle of an expression stored in an [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(usize);

impl Display for ExprId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

#[derive(Debug)]
struct Slot {
	expression: Option<Expression>,
	refs:       usize,
}

/// Allocation counters of an arena.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
	pub allocated: usize,
	pub freed:     usize,
}

impl ArenaStats {
	pub fn live(&self) -> usize { self.allocated - self.freed }
}

/// Reference counted storage for expression trees.
///
/// A node owns one reference to each of its children. Releasing the last
/// reference to a node frees it and releases its children in turn. Slots of
/// freed nodes are never handed out again, touching a freed handle panics.
#[derive(Debug, Default)]
pub struct ExprArena {
	slots: Vec<Slot>,
	freed: usize,
}

impl ExprArena {
	pub fn new() -> Self { Self::default() }

	/// Stores `expression` with a reference count of one, taking over the
	/// references it holds to its children.
	pub fn alloc(&mut self, expression: Expression) -> ExprId {
		let id = ExprId(self.slots.len());
		self.slots.push(Slot { expression: Some(expression), refs: 1 });
		id
	}

	pub fn get(&self, id: ExprId) -> &Expression {
		match self.slots.get(id.0).and_then(|slot| slot.expression.as_ref()) {
			Some(expression) => expression,
			None => panic!("use of freed expression {id}"),
		}
	}

	pub fn retain(&mut self, id: ExprId) -> ExprId {
		self.slot_mut(id).refs += 1;
		id
	}

	/// Drops one reference to `id`, freeing every node that becomes
	/// unreachable.
	pub fn release(&mut self, id: ExprId) {
		let mut pending = vec![id];
		while let Some(id) = pending.pop() {
			let slot = self.slot_mut(id);
			slot.refs -= 1;
			if slot.refs > 0 {
				continue;
			}
			if let Some(expression) = slot.expression.take() {
				self.freed += 1;
				pending.extend(expression.children());
			}
		}
	}

	pub fn ref_count(&self, id: ExprId) -> usize { self.slots.get(id.0).map_or(0, |slot| slot.refs) }

	pub fn is_live(&self, id: ExprId) -> bool {
		self.slots.get(id.0).is_some_and(|slot| slot.expression.is_some())
	}

	pub fn stats(&self) -> ArenaStats { ArenaStats { allocated: self.slots.len(), freed: self.freed } }

	fn slot_mut(&mut self, id: ExprId) -> &mut Slot {
		match self.slots.get_mut(id.0) {
			Some(slot) if slot.expression.is_some() => slot,
			_ => panic!("use of freed expression {id}"),
		}
	}
}
