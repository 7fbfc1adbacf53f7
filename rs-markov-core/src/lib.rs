//! Order-k Markov chain text generation library.
//!
//! This crate provides:
//! - A token-level Markov chain of configurable order
//! - Lazy, pull-based generation from the learned statistics
//! - A regex tokenizer with whitespace and case folding
//! - A compact binary chain file format
//!
//! Rendering generated tokens back to text is left to the caller:
//! concatenating them is enough.

/// Markov chain, transition states and the generation cursor.
pub mod model;

/// Text to token stream conversion.
pub mod tokenizer;

/// Chain file encoding and decoding (`postcard`).
pub mod persistence;

/// Input file reading and text encodings.
pub mod io;

/// Error type shared by the whole crate.
pub mod error;

pub use error::{MarkovError, Result};
pub use model::{Context, Emitter, MarkovChain, State, Token};
pub use tokenizer::{Tokenizer, TokenizerConfig};
