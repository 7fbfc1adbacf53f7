use std::collections::BTreeMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

use super::Token;

/// Represents a state of the Markov chain.
///
/// A `State` stores every token observed right after one context, together
/// with the number of times each transition was seen during learning.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
/// - A state stored in a chain has at least one transition
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	/// Outgoing transitions indexed by the next token, kept sorted so that
	/// a given random draw always selects the same token.
	/// Example: { "cat" => 42, "dog" => 3 }
	transitions: BTreeMap<Token, usize>,
}

impl State {
	/// Creates a new empty state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of a transition toward `next`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition(&mut self, next: &str) {
		match self.transitions.get_mut(next) {
			Some(occurrence) => *occurrence += 1,
			None => {
				self.transitions.insert(next.to_owned(), 1);
			}
		}
	}

	/// Number of times `token` followed this state.
	pub fn count(&self, token: &str) -> usize {
		self.transitions.get(token).copied().unwrap_or(0)
	}

	/// Sum of all outgoing occurrence counts.
	pub fn total(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Number of distinct successor tokens.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Iterates over `(token, count)` pairs in token order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.transitions.iter().map(|(token, occurrence)| (token.as_str(), *occurrence))
	}

	/// Predicts the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count: a value is drawn uniformly in `[0, total)` and the
	/// first cumulative bound exceeding it wins.
	///
	/// Returns `None` if the state has no transitions.
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&Token> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (next, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next);
			}
			r -= occurrence;
		}

		// Unreachable while counts sum to `total`
		self.transitions.keys().next_back()
	}
}
