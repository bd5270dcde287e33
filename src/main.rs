//! Hammurabi - Entry Point
//!
//! Runs a batch of independent reigns across a pool of worker threads, or
//! narrates a single reign year by year.

use std::path::PathBuf;

use clap::Parser;
use hammurabi::core::config::BatchConfig;
use hammurabi::core::error::Result;
use hammurabi::kingdom::{event_source, run_batch, run_trial, FixedPolicy, KingdomState};

/// Hammurabi - bulk kingdom trials
#[derive(Parser, Debug)]
#[command(name = "hammurabi")]
#[command(about = "Simulate many ten-year reigns in parallel")]
struct Args {
    /// Number of threads to use
    #[arg(long)]
    threads: Option<usize>,

    /// Total number of trials, split evenly across threads
    #[arg(long)]
    trials: Option<u64>,

    /// Base random seed (worker i uses seed + i)
    #[arg(long)]
    seed: Option<u64>,

    /// Use fixed event values instead of random draws
    #[arg(long)]
    deterministic: bool,

    /// TOML file with batch settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Play a single reign and print every year's summary
    #[arg(long)]
    narrate: bool,

    /// Print the batch summary as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn batch_config(&self) -> Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::load(path)?,
            None => BatchConfig::default(),
        };

        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.deterministic {
            config.deterministic = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hammurabi=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.batch_config()?;

    if args.narrate {
        return narrate(&config);
    }

    let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
    println!("CPUs={}", cpus);
    println!("Threads={}", config.threads);

    let summary = run_batch(&config)?;

    if args.json {
        println!("{}", summary.to_json());
    } else {
        println!("{}", summary.summary());
    }
    println!("Done");

    Ok(())
}

/// Play one reign with the configured decisions and print each year
fn narrate(config: &BatchConfig) -> Result<()> {
    let seed = config.seed.unwrap_or_else(rand::random);
    let state = KingdomState::new(event_source(config.deterministic, seed));

    println!("{}", state.report().summary());

    let outcome = run_trial(state, &FixedPolicy(config.decisions), true)?;
    for year in &outcome.history {
        println!("{}", year.summary());
    }

    if outcome.completed_term() {
        println!("\nYou served your full term of {} years.", outcome.final_state.year_of_rule);
    } else {
        println!(
            "\nYour reign ended in year {} with {} subjects left.",
            outcome.final_state.year_of_rule, outcome.final_state.population
        );
    }

    Ok(())
}
