use std::iter::FusedIterator;

use log::trace;
use rand::Rng;

use super::context::Context;
use super::markov_chain::MarkovChain;
use super::Token;

/// A lazy random walk over a `MarkovChain`.
///
/// Each call to `next` resumes from the current context, samples the next
/// token in proportion to its learned count, yields it and slides the
/// context forward. Nothing is computed between calls, so the consumer
/// decides how many tokens to pull and may stop at any point.
///
/// `None` means the walk reached a context with no recorded continuation.
/// Once exhausted, the emitter stays exhausted.
pub struct Emitter<'a, R> {
	chain: &'a MarkovChain,
	rng: R,
	/// `None` once the walk is exhausted
	context: Option<Context>,
}

impl<'a, R: Rng> Emitter<'a, R> {
	/// Starts a walk from a context chosen uniformly at random.
	pub(crate) fn new(chain: &'a MarkovChain, mut rng: R) -> Self {
		let context = chain.random_context(&mut rng).cloned();
		Self { chain, rng, context }
	}

	/// Starts a walk from a given context.
	pub(crate) fn starting_at(chain: &'a MarkovChain, context: Context, rng: R) -> Self {
		Self { chain, rng, context: Some(context) }
	}

	/// The context the next token will be drawn from.
	pub fn context(&self) -> Option<&Context> {
		self.context.as_ref()
	}

	pub fn is_exhausted(&self) -> bool {
		self.context.is_none()
	}
}

impl<R: Rng> Iterator for Emitter<'_, R> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		let context = self.context.as_mut()?;
		let chain = self.chain;

		let Some(token) = chain.get(context.as_slice()).and_then(|state| state.predict(&mut self.rng)) else {
			trace!("emission exhausted at context {:?}", context.to_string());
			self.context = None;
			return None;
		};

		context.shift(token.clone());
		Some(token.clone())
	}
}

impl<R: Rng> FusedIterator for Emitter<'_, R> {}
