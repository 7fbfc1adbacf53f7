use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, Result};
use crate::model::MarkovChain;

/// Version written in every chain file.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk layout of a chain file, encoded with `postcard`.
#[derive(Serialize)]
struct ChainFileRef<'a> {
	version: u32,
	chain: &'a MarkovChain,
}

#[derive(Deserialize)]
struct ChainFile {
	version: u32,
	chain: MarkovChain,
}

/// Encodes a chain into its compact binary form.
pub fn to_bytes(chain: &MarkovChain) -> Result<Vec<u8>> {
	Ok(postcard::to_stdvec(&ChainFileRef { version: FORMAT_VERSION, chain })?)
}

/// Decodes a chain previously produced by `to_bytes`.
///
/// # Errors
/// - `MarkovError::Serialization` if the bytes cannot be decoded
/// - `MarkovError::FormatVersion` if the file was written by another format version
/// - `MarkovError::CorruptChain` (or `InvalidOrder`) if the decoded table breaks the chain invariants
pub fn from_bytes(bytes: &[u8]) -> Result<MarkovChain> {
	let file: ChainFile = postcard::from_bytes(bytes)?;
	if file.version != FORMAT_VERSION {
		return Err(MarkovError::FormatVersion { expected: FORMAT_VERSION, found: file.version });
	}
	file.chain.validate()?;
	Ok(file.chain)
}

/// Writes a chain to `path`, replacing any existing file.
pub fn save<P: AsRef<Path>>(chain: &MarkovChain, path: P) -> Result<()> {
	let bytes = to_bytes(chain)?;
	std::fs::write(&path, &bytes)?;
	info!(
		"saved chain (order {}, {} contexts, {} bytes) to {}",
		chain.order(),
		chain.len(),
		bytes.len(),
		path.as_ref().display()
	);
	Ok(())
}

/// Reads a chain from `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MarkovChain> {
	let bytes = std::fs::read(&path)?;
	let chain = from_bytes(&bytes)?;
	info!(
		"loaded chain (order {}, {} contexts) from {}",
		chain.order(),
		chain.len(),
		path.as_ref().display()
	);
	Ok(chain)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::BTreeMap;

	#[test]
	fn round_trip_keeps_table() {
		let mut chain = MarkovChain::new(2).unwrap();
		chain.learn(["a", "b", "c", "a", "b", "d", "a", "b", "c"]);

		let restored = from_bytes(&to_bytes(&chain).unwrap()).unwrap();
		assert_eq!(restored, chain);
		assert_eq!(restored.order(), 2);
	}

	#[test]
	fn empty_chain_round_trips() {
		let chain = MarkovChain::new(4).unwrap();
		let restored = from_bytes(&to_bytes(&chain).unwrap()).unwrap();
		assert!(restored.is_empty());
		assert_eq!(restored.order(), 4);
	}

	#[test]
	fn unknown_version_is_rejected() {
		let chain = MarkovChain::new(1).unwrap();
		let bytes = postcard::to_stdvec(&ChainFileRef { version: FORMAT_VERSION + 1, chain: &chain }).unwrap();
		assert!(matches!(
			from_bytes(&bytes),
			Err(MarkovError::FormatVersion { found, .. }) if found == FORMAT_VERSION + 1
		));
	}

	/// Same wire shape as `ChainFile`, without the invariants.
	#[derive(Serialize)]
	struct RawChainFile {
		version: u32,
		order: usize,
		states: BTreeMap<Vec<String>, BTreeMap<String, usize>>,
	}

	fn raw_bytes(order: usize, context: &[&str], next: &str, count: usize) -> Vec<u8> {
		let mut transitions = BTreeMap::new();
		transitions.insert(next.to_owned(), count);
		let mut states = BTreeMap::new();
		states.insert(context.iter().map(|t| (*t).to_owned()).collect(), transitions);
		postcard::to_stdvec(&RawChainFile { version: FORMAT_VERSION, order, states }).unwrap()
	}

	#[test]
	fn raw_layout_matches_chain_file() {
		let chain = from_bytes(&raw_bytes(1, &["a"], "b", 3)).unwrap();
		assert_eq!(chain.get(&["a".to_owned()]).unwrap().count("b"), 3);
	}

	#[test]
	fn broken_invariants_are_rejected() {
		assert!(matches!(from_bytes(&raw_bytes(2, &["a"], "b", 1)), Err(MarkovError::CorruptChain(_))));
		assert!(matches!(from_bytes(&raw_bytes(1, &["a"], "b", 0)), Err(MarkovError::CorruptChain(_))));
		assert!(matches!(from_bytes(&raw_bytes(0, &[], "b", 1)), Err(MarkovError::InvalidOrder(0))));
	}

	#[test]
	fn overflowing_counts_are_rejected() {
		let mut transitions = BTreeMap::new();
		transitions.insert("x".to_owned(), usize::MAX);
		transitions.insert("y".to_owned(), 1);
		let mut states = BTreeMap::new();
		states.insert(vec!["a".to_owned()], transitions);
		let bytes = postcard::to_stdvec(&RawChainFile { version: FORMAT_VERSION, order: 1, states }).unwrap();

		assert!(matches!(from_bytes(&bytes), Err(MarkovError::CorruptChain(_))));
	}

	#[test]
	fn garbage_is_rejected() {
		assert!(matches!(from_bytes(&[]), Err(MarkovError::Serialization(_))));
	}

	#[test]
	fn save_and_load_through_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("chain.bin");

		let mut chain = MarkovChain::new(1).unwrap();
		chain.learn(["x", "y", "x", "z"]);
		save(&chain, &path).unwrap();

		assert_eq!(load(&path).unwrap(), chain);
		assert!(matches!(load(dir.path().join("nope.bin")), Err(MarkovError::Io(_))));
	}
}
