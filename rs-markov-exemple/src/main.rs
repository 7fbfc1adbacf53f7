use rs_markov_core::persistence;
use rs_markov_core::{MarkovChain, Tokenizer, TokenizerConfig};

const TEXT: &str = "It was the best of times, it was the worst of times, \
    it was the age of wisdom, it was the age of foolishness, \
    it was the epoch of belief, it was the epoch of incredulity.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fold tabs/newlines to spaces and lower-case everything
    let config = TokenizerConfig {
        fold_whitespace: true,
        fold_case: true,
    };
    let tokenizer = Tokenizer::new(config);

    // Order 0 is refused
    match MarkovChain::new(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Order 0: {}", e),
    }

    // Each context holds the 3 previous tokens (words, spaces and punctuation)
    let mut chain = MarkovChain::new(3)?;
    let recorded = chain.learn(tokenizer.tokenize(TEXT));
    println!(
        "Learned {} transitions, {} contexts",
        recorded,
        chain.len()
    );

    // A chain is a plain value: it can go through the chain file format and back
    let chain = persistence::from_bytes(&persistence::to_bytes(&chain)?)?;

    // Generation is lazy: only the pulled tokens are computed.
    // A run may end early if it reaches the end of the training text.
    for i in 0..5 {
        let text: String = chain.emit().take(40).collect();
        println!("Generated text {}: {}", i + 1, text);
    }

    // Start from a chosen context
    let text: String = chain
        .emit_from(["it", " ", "was"], rand::rng())?
        .take(20)
        .collect();
    println!("From \"it was\": it was{}", text);

    Ok(())
}

