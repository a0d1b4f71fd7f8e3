/// Errors raised while emitting bytecode.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
	/// The expression kind has no emitter yet.
	#[error("Code generation for {0} expressions is not implemented")]
	NotImplemented(&'static str),
}
