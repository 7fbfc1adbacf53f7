use std::sync::LazyLock;

use regex::Regex;

use crate::model::Token;

/// Splits text into words, whitespace runs and the punctuation marks
/// `, . ? ! " ' [ ] ( )`. Any other character is dropped.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	// Should not panic, the pattern is a literal
	Regex::new(r#"\w+|\s+|,|\.|\?|!|"|'|\[|\]|\(|\)|\n"#).unwrap()
});

/// Filters applied to every token before it reaches the chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerConfig {
	/// Map tabs and newlines to plain spaces.
	pub fold_whitespace: bool,

	/// Map all characters to lower case.
	pub fold_case: bool,
}

impl TokenizerConfig {
	/// Applies whitespace folding, then case folding.
	fn apply(&self, raw: &str) -> Token {
		let token = if self.fold_whitespace {
			raw.replace(['\t', '\n'], " ")
		} else {
			raw.to_owned()
		};

		if self.fold_case { token.to_lowercase() } else { token }
	}
}

/// Regex-driven tokenizer producing the stream consumed by `MarkovChain::learn`.
///
/// Concatenating the tokens of a text gives the text back, minus the
/// characters the pattern does not cover and modulo the configured folding.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tokenizer {
	config: TokenizerConfig,
}

impl Tokenizer {
	pub fn new(config: TokenizerConfig) -> Self {
		Self { config }
	}

	/// Lazily tokenizes `text` in reading order.
	pub fn tokenize<'t>(&self, text: &'t str) -> impl Iterator<Item = Token> + use<'t> {
		let config = self.config;
		TOKEN_PATTERN.find_iter(text).map(move |m| config.apply(m.as_str()))
	}
}
