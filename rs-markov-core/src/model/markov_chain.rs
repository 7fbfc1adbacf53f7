use std::collections::{BTreeMap, VecDeque};

use log::debug;
use rand::Rng;
use rand::prelude::IteratorRandom;
use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};

use super::context::Context;
use super::emitter::Emitter;
use super::state::State;
use super::Token;
use crate::error::{MarkovError, Result};

/// An order-`k` Markov chain over text tokens.
///
/// The `MarkovChain` maps every context of `order` consecutive tokens seen
/// during learning to the `State` holding the tokens that followed it.
///
/// # Responsibilities
/// - Build the transition table from one or more token streams
/// - Emit new token sequences by walking the table at random
/// - Expose its `(order, table)` shape for persistence
///
/// # Invariants
/// - `order` is always >= 1 and never changes
/// - Every context in `states` holds exactly `order` tokens
/// - Every state holds at least one transition, each counted at least once
///
/// `learn` takes `&mut self` and emission borrows the chain immutably, so
/// the two can never overlap on one instance. Any number of emitters may
/// walk the same chain at once.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MarkovChain {
	/// Number of tokens in a context
	order: usize,

	/// Mapping from a context to the transitions observed after it
	states: BTreeMap<Context, State>,
}

impl MarkovChain {
	/// Creates an empty chain of the given order.
	///
	/// # Errors
	/// Returns `MarkovError::InvalidOrder` if `order` is 0.
	pub fn new(order: usize) -> Result<Self> {
		if order == 0 {
			return Err(MarkovError::InvalidOrder(order));
		}
		Ok(Self { order, states: BTreeMap::new() })
	}

	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of distinct contexts in the table.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Total number of transitions recorded, counting repeats.
	pub fn transition_count(&self) -> usize {
		self.states.values().map(State::total).sum()
	}

	/// Looks up the state reached after `context`.
	pub fn get(&self, context: &[Token]) -> Option<&State> {
		self.states.get(context)
	}

	/// Iterates over the table in context order.
	pub fn contexts(&self) -> impl Iterator<Item = (&Context, &State)> {
		self.states.iter()
	}

	/// Picks a context uniformly among all learned contexts.
	///
	/// Returns `None` if nothing was learned.
	pub fn random_context<R: Rng>(&self, rng: &mut R) -> Option<&Context> {
		self.states.keys().choose(rng)
	}

	/// Learns transitions from a token stream.
	///
	/// A sliding window of the last `order` tokens is kept: once it is full,
	/// each further token is recorded as a transition from the window, then
	/// the window drops its oldest token and takes the new one.
	///
	/// Each call starts with an empty window, so separate calls are treated
	/// as separate documents; counts from every call add up.
	///
	/// Returns the number of transitions recorded by this call, which is
	/// `n - order` for a stream of `n > order` tokens and 0 otherwise.
	pub fn learn<I>(&mut self, tokens: I) -> usize
	where
		I: IntoIterator,
		I::Item: Into<Token>,
	{
		let mut window: VecDeque<Token> = VecDeque::with_capacity(self.order + 1);
		let mut recorded = 0;

		for token in tokens {
			let token = token.into();
			if window.len() == self.order {
				let context = window.make_contiguous();
				match self.states.get_mut(&*context) {
					Some(state) => state.add_transition(&token),
					None => {
						let mut state = State::new();
						state.add_transition(&token);
						self.states.insert(Context::from(&*context), state);
					}
				}
				recorded += 1;
				window.pop_front();
			}
			window.push_back(token);
		}

		debug!(
			"learned {} transitions (order {}, {} contexts in table)",
			recorded,
			self.order,
			self.states.len()
		);
		recorded
	}

	/// Emits a lazy token sequence using the thread-local random generator.
	pub fn emit(&self) -> Emitter<'_, ThreadRng> {
		self.emit_with(rand::rng())
	}

	/// Emits a lazy token sequence drawing from `rng`.
	///
	/// The walk starts from a context chosen uniformly at random. If the
	/// chain is empty, the sequence is exhausted from the start.
	pub fn emit_with<R: Rng>(&self, rng: R) -> Emitter<'_, R> {
		Emitter::new(self, rng)
	}

	/// Emits a lazy token sequence starting from `context`.
	///
	/// An unknown context is accepted and yields an exhausted sequence.
	///
	/// # Errors
	/// Returns `MarkovError::ContextLength` if `context` does not hold
	/// exactly `order` tokens.
	pub fn emit_from<R: Rng>(&self, context: impl Into<Context>, rng: R) -> Result<Emitter<'_, R>> {
		let context = context.into();
		if context.len() != self.order {
			return Err(MarkovError::ContextLength { expected: self.order, got: context.len() });
		}
		Ok(Emitter::starting_at(self, context, rng))
	}

	/// Checks the table invariants, reporting the first violation found.
	///
	/// Learning cannot break them; this is meant for chains restored from
	/// outside, such as a chain file.
	pub fn validate(&self) -> Result<()> {
		if self.order == 0 {
			return Err(MarkovError::InvalidOrder(self.order));
		}
		for (context, state) in &self.states {
			if context.len() != self.order {
				return Err(MarkovError::CorruptChain(format!(
					"context {:?} has {} tokens, expected {}",
					context.to_string(),
					context.len(),
					self.order
				)));
			}
			if state.is_empty() {
				return Err(MarkovError::CorruptChain(format!(
					"context {:?} has no transitions",
					context.to_string()
				)));
			}
			if let Some((token, _)) = state.iter().find(|(_, occurrence)| *occurrence == 0) {
				return Err(MarkovError::CorruptChain(format!(
					"transition {:?} -> {:?} has a zero count",
					context.to_string(),
					token
				)));
			}
			let total = state.iter().try_fold(0usize, |total, (_, occurrence)| total.checked_add(occurrence));
			if total.is_none() {
				return Err(MarkovError::CorruptChain(format!(
					"transition counts of context {:?} overflow",
					context.to_string()
				)));
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(s: &[&str]) -> Vec<String> {
		s.iter().map(|t| (*t).to_owned()).collect()
	}

	#[test]
	fn zero_order_is_rejected() {
		assert!(matches!(MarkovChain::new(0), Err(MarkovError::InvalidOrder(0))));
	}

	#[test]
	fn learns_order_one_scenario() {
		let mut chain = MarkovChain::new(1).unwrap();
		let recorded = chain.learn(["a", "b", "a", "c"]);

		assert_eq!(recorded, 3);
		assert_eq!(chain.len(), 2);

		let a = chain.get(&tokens(&["a"])).unwrap();
		assert_eq!(a.count("b"), 1);
		assert_eq!(a.count("c"), 1);
		assert_eq!(a.total(), 2);

		let b = chain.get(&tokens(&["b"])).unwrap();
		assert_eq!(b.count("a"), 1);
		assert_eq!(b.total(), 1);

		// "c" was never followed by anything
		assert!(chain.get(&tokens(&["c"])).is_none());
	}

	#[test]
	fn short_stream_records_nothing() {
		let mut chain = MarkovChain::new(3).unwrap();
		assert_eq!(chain.learn(["x", "y", "z"]), 0);
		assert_eq!(chain.learn(Vec::<String>::new()), 0);
		assert!(chain.is_empty());
		assert_eq!(chain.transition_count(), 0);
	}

	#[test]
	fn contexts_have_order_length() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.learn(["the", " ", "cat", " ", "sat", " ", "on", " ", "the", " ", "mat"]);
		assert!(chain.contexts().all(|(context, _)| context.len() == 2));
		assert_eq!(chain.transition_count(), 9);
	}

	#[test]
	fn learn_calls_do_not_share_a_window() {
		let mut chain = MarkovChain::new(1).unwrap();
		chain.learn(["a", "b"]);
		chain.learn(["c", "d"]);

		// No "b" -> "c" bridge across the two calls
		assert!(chain.get(&tokens(&["b"])).is_none());
		assert_eq!(chain.transition_count(), 2);
	}

	#[test]
	fn validate_accepts_learned_chain() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.learn(["a", "b", "c", "a", "b", "d"]);
		assert!(chain.validate().is_ok());
	}

	#[test]
	fn emit_from_checks_context_length() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.learn(["a", "b", "c"]);
		let err = chain.emit_from(["a"], rand::rng()).err();
		assert!(matches!(err, Some(MarkovError::ContextLength { expected: 2, got: 1 })));
	}
}
