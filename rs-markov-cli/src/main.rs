use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use env_logger::Env;
use log::{LevelFilter, debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_markov_core::io::{Encoding, read_text};
use rs_markov_core::persistence;
use rs_markov_core::{MarkovChain, Tokenizer, TokenizerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Markov chain text generator", long_about = None)]
struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	quiet: u8,

	#[command(subcommand)]
	command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Learn the markov chain from a source file
	LearnWords(LearnArgs),
	/// Load a saved markov chain and produce data from it
	Produce(ProduceArgs),
}

#[derive(Args, Debug)]
struct LearnArgs {
	/// File to learn from. Must be plaintext
	#[arg(value_name = "INFILE")]
	infile: PathBuf,

	/// Order of the markov chain. Must be a positive integer.
	#[arg(value_parser = positive_int)]
	order: usize,

	/// File to store the learned data to. Can be omitted if --no-save is set.
	#[arg(value_name = "OUTFILE")]
	chainfile: Option<PathBuf>,

	/// Must be set to omit the chainfile argument
	#[arg(long = "no-save", action = ArgAction::SetFalse)]
	save: bool,

	/// Encoding used for the input file, defaults to utf-8
	#[arg(long, value_name = "CODING", default_value = "utf-8")]
	encoding: Encoding,

	/// Map all whitespace to plain spaces
	#[arg(long)]
	fold_whitespace: bool,

	/// Map all characters to lower case
	#[arg(long)]
	fold_case: bool,
}

#[derive(Args, Debug)]
struct ProduceArgs {
	/// Chain file to load
	chainfile: PathBuf,

	/// Produce NUMBER units of output
	#[arg(value_name = "NUMBER", value_parser = positive_int)]
	units: usize,

	/// Seed the random generator for a reproducible run
	#[arg(long, value_name = "N")]
	seed: Option<u64>,
}

fn positive_int(s: &str) -> Result<usize, String> {
	let i: i64 = s.parse().map_err(|e| format!("invalid integer {s:?}: {e}"))?;
	if i <= 0 {
		return Err(format!("Out of bounds: {i}"));
	}
	usize::try_from(i).map_err(|e| e.to_string())
}

fn main() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	match cli.command {
		Some(Commands::LearnWords(args)) => run_learn(args),
		Some(Commands::Produce(args)) => run_produce(args),
		None => {
			Cli::command().print_help()?;
			Ok(ExitCode::SUCCESS)
		}
	}
}

/// `RUST_LOG` (default `warn`) applies unless `-v` or `-q` is given.
fn init_logging(verbose: u8, quiet: u8) {
	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	builder.format_timestamp_millis();

	if quiet > 0 {
		builder.filter_level(match quiet {
			1 => LevelFilter::Error,
			_ => LevelFilter::Off,
		});
	} else if verbose > 0 {
		builder.filter_level(match verbose {
			1 => LevelFilter::Info,
			2 => LevelFilter::Debug,
			_ => LevelFilter::Trace,
		});
	}

	let _ = builder.try_init();
}

fn run_learn(args: LearnArgs) -> Result<ExitCode> {
	if args.chainfile.is_none() && args.save {
		println!("Chainfile argument omitted, but --no-save is not set.");
		return Ok(ExitCode::FAILURE);
	}

	let config = TokenizerConfig { fold_whitespace: args.fold_whitespace, fold_case: args.fold_case };
	let text = read_text(&args.infile, args.encoding)
		.with_context(|| format!("failed to read {}", args.infile.display()))?;
	info!("read {} ({} bytes, {})", args.infile.display(), text.len(), args.encoding);

	print!("learning ... ");
	io::stdout().flush()?;
	let mut chain = MarkovChain::new(args.order)?;
	let recorded = chain.learn(Tokenizer::new(config).tokenize(&text));
	println!("done.");
	info!(
		"recorded {} transitions over {} contexts (order {})",
		recorded,
		chain.len(),
		chain.order()
	);

	if let Some(path) = &args.chainfile {
		persistence::save(&chain, path)
			.with_context(|| format!("failed to write chain to {}", path.display()))?;
	}

	Ok(ExitCode::SUCCESS)
}

fn run_produce(args: ProduceArgs) -> Result<ExitCode> {
	let chain = persistence::load(&args.chainfile)
		.with_context(|| format!("failed to load chain from {}", args.chainfile.display()))?;

	let rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_rng(&mut rand::rng()),
	};

	let stdout = io::stdout();
	let mut out = BufWriter::new(stdout.lock());
	let mut produced = 0;
	for token in chain.emit_with(rng).take(args.units) {
		out.write_all(token.as_bytes())?;
		produced += 1;
	}
	writeln!(out)?;
	out.flush()?;

	if produced < args.units {
		debug!("chain exhausted after {} of {} units", produced, args.units);
	}

	Ok(ExitCode::SUCCESS)
}
