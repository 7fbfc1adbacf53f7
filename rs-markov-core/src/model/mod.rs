//! Top-level module for the Markov chain model.
//!
//! This module provides:
//! - The order-k chain and its learning pass (`MarkovChain`)
//! - Per-context transition counts (`State`)
//! - Token windows used as table keys (`Context`)
//! - The lazy generation cursor (`Emitter`)

/// Order-k Markov chain (`order >= 1`).
///
/// Handles token stream ingestion, transition counting and
/// invariant checks for restored chains.
pub mod markov_chain;

/// Lazy, pull-based token generation over a learned chain.
pub mod emitter;

/// Fixed-length token window used as lookup key.
pub mod context;

/// Outgoing transitions of a single context.
///
/// Tracks occurrence counts and supports weighted random sampling.
pub mod state;

/// Smallest unit of text handled by the chain: a word, a whitespace run,
/// or a punctuation character.
pub type Token = String;

pub use context::Context;
pub use emitter::Emitter;
pub use markov_chain::MarkovChain;
pub use state::State;
