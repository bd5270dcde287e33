//! Trial driver
//!
//! A trial plays one reign from setup to the end of office. Batches run many
//! trials across a rayon pool; each worker owns its RNG and its kingdoms, so
//! workers never share mutable state and only meet at the final reduce.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::core::config::BatchConfig;
use crate::core::error::{KingdomError, Result};
use crate::kingdom::events::EventSource;
use crate::kingdom::output::{BatchSummary, BatchTally, TrialOutcome};
use crate::kingdom::policy::{FixedPolicy, RulerPolicy};
use crate::kingdom::state::KingdomState;

/// Play a reign to its end
pub fn run_trial<R, P>(mut state: KingdomState<R>, policy: &P, keep_history: bool) -> Result<TrialOutcome>
where
    R: Rng,
    P: RulerPolicy<R> + ?Sized,
{
    let mut history = Vec::new();

    while state.still_in_office() {
        let decisions = policy.decide(&state);
        state.tally_up_year(decisions)?;

        if keep_history {
            history.push(state.report());
        }
    }

    Ok(TrialOutcome {
        final_state: state.report(),
        history,
    })
}

/// Event source for a standalone trial
pub fn event_source(deterministic: bool, seed: u64) -> EventSource {
    if deterministic {
        EventSource::Deterministic
    } else {
        EventSource::Random(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Run every trial in the batch and wait for all workers to finish
pub fn run_batch(config: &BatchConfig) -> Result<BatchSummary> {
    config.validate()?;

    let start = Instant::now();
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let trials_per_thread = config.trials_per_thread();
    let policy = FixedPolicy(config.decisions);

    tracing::info!(
        "Running {} trials per thread on {} threads (base seed {}, deterministic: {})",
        trials_per_thread,
        config.threads,
        base_seed,
        config.deterministic
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| KingdomError::ThreadPool(e.to_string()))?;

    let tally = pool.install(|| {
        (0..config.threads as u64)
            .into_par_iter()
            .map(|worker| {
                run_worker(
                    base_seed.wrapping_add(worker),
                    trials_per_thread,
                    config.deterministic,
                    &policy,
                )
            })
            .try_reduce(BatchTally::default, |a, b| Ok(a.merge(b)))
    })?;

    let summary = BatchSummary::new(config.threads, tally, start.elapsed());
    tracing::info!(
        "Batch finished: {} trials in {}ms",
        summary.trials,
        summary.simulation_time_ms
    );

    Ok(summary)
}

fn run_worker(seed: u64, trials: u64, deterministic: bool, policy: &FixedPolicy) -> Result<BatchTally> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tally = BatchTally::default();

    for _ in 0..trials {
        let events = if deterministic {
            EventSource::Deterministic
        } else {
            EventSource::Random(&mut rng)
        };
        let outcome = run_trial(KingdomState::new(events), policy, false)?;
        tally.record(&outcome);
    }

    tracing::debug!("Worker seeded {} finished {} trials", seed, trials);
    Ok(tally)
}
