use std::io;

/// Errors reported by the chain, the tokenizer input path and the chain file adapter.
///
/// Running out of continuations during generation is not an error: an
/// `Emitter` simply returns `None`.
#[derive(Debug, thiserror::Error)]
pub enum MarkovError {
	#[error("order must be a positive integer, got {0}")]
	InvalidOrder(usize),

	#[error("context has {got} tokens, the chain order is {expected}")]
	ContextLength { expected: usize, got: usize },

	#[error("unsupported encoding: {0}")]
	UnsupportedEncoding(String),

	#[error("input is not valid {encoding}: {reason}")]
	Decode { encoding: &'static str, reason: String },

	#[error("unsupported chain file version {found} (expected {expected})")]
	FormatVersion { expected: u32, found: u32 },

	#[error("corrupt chain: {0}")]
	CorruptChain(String),

	#[error("serialization failed: {0}")]
	Serialization(#[from] postcard::Error),

	#[error(transparent)]
	Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MarkovError>;
