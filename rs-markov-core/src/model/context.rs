use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Token;

/// An ordered window of exactly `order` tokens, used as lookup key into
/// the transition table.
///
/// Equality, ordering and hashing are those of the underlying token
/// sequence. A `Context` borrows as `[Token]`, so the table can be probed
/// with a plain slice without allocating a key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Context(Vec<Token>);

impl Context {
	pub fn new(tokens: Vec<Token>) -> Self {
		Self(tokens)
	}

	pub fn as_slice(&self) -> &[Token] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Drops the oldest token and appends `next`, keeping the length unchanged.
	pub(crate) fn shift(&mut self, next: Token) {
		if !self.0.is_empty() {
			self.0.remove(0);
		}
		self.0.push(next);
	}
}

impl Borrow<[Token]> for Context {
	fn borrow(&self) -> &[Token] {
		&self.0
	}
}

impl From<Vec<Token>> for Context {
	fn from(tokens: Vec<Token>) -> Self {
		Self(tokens)
	}
}

impl From<&[Token]> for Context {
	fn from(tokens: &[Token]) -> Self {
		Self(tokens.to_vec())
	}
}

impl<const N: usize> From<[&str; N]> for Context {
	fn from(tokens: [&str; N]) -> Self {
		Self(tokens.iter().map(|t| (*t).to_owned()).collect())
	}
}

/// Renders the context the way it appeared in the source text.
impl fmt::Display for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for token in &self.0 {
			f.write_str(token)?;
		}
		Ok(())
	}
}
