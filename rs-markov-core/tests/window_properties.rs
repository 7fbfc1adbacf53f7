use std::collections::HashMap;

use proptest::prelude::*;

use rs_markov_core::persistence;
use rs_markov_core::{MarkovChain, Token};

/// Token streams over a small alphabet, so contexts repeat often.
fn token_stream() -> impl Strategy<Value = Vec<Token>> {
	prop::collection::vec(
		prop::sample::select(vec!["the", "cat", " ", ".", "\n", "sat"]).prop_map(str::to_owned),
		0..80,
	)
}

/// Successor counts per context, computed straight from the windows.
fn window_counts(streams: &[&[Token]], order: usize) -> HashMap<(Vec<Token>, Token), usize> {
	let mut counts = HashMap::new();
	for stream in streams {
		for window in stream.windows(order + 1) {
			*counts.entry((window[..order].to_vec(), window[order].clone())).or_default() += 1;
		}
	}
	counts
}

fn table_counts(chain: &MarkovChain) -> HashMap<(Vec<Token>, Token), usize> {
	chain
		.contexts()
		.flat_map(|(context, state)| {
			state
				.iter()
				.map(move |(next, count)| ((context.as_slice().to_vec(), next.to_owned()), count))
		})
		.collect()
}

proptest! {
	#[test]
	fn records_one_transition_per_full_window(order in 1usize..5, tokens in token_stream()) {
		let mut chain = MarkovChain::new(order).unwrap();
		let recorded = chain.learn(tokens.iter().cloned());

		prop_assert_eq!(recorded, tokens.len().saturating_sub(order));
		prop_assert_eq!(chain.transition_count(), recorded);
		prop_assert!(chain.contexts().all(|(context, state)| context.len() == order && !state.is_empty()));
		prop_assert!(chain.validate().is_ok());
	}

	#[test]
	fn counts_equal_observed_successors(order in 1usize..4, tokens in token_stream()) {
		let mut chain = MarkovChain::new(order).unwrap();
		chain.learn(tokens.iter().cloned());

		prop_assert_eq!(table_counts(&chain), window_counts(&[tokens.as_slice()], order));
	}

	#[test]
	fn separate_calls_add_without_bridging(order in 1usize..4, first in token_stream(), second in token_stream()) {
		let mut chain = MarkovChain::new(order).unwrap();
		chain.learn(first.iter().cloned());
		chain.learn(second.iter().cloned());

		prop_assert_eq!(table_counts(&chain), window_counts(&[first.as_slice(), second.as_slice()], order));
	}

	#[test]
	fn chain_file_round_trip_is_lossless(order in 1usize..4, tokens in token_stream()) {
		let mut chain = MarkovChain::new(order).unwrap();
		chain.learn(tokens.iter().cloned());

		let restored = persistence::from_bytes(&persistence::to_bytes(&chain).unwrap()).unwrap();
		prop_assert_eq!(restored, chain);
	}
}
