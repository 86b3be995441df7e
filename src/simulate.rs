//! Batch autoplay against a truthful oracle.
//!
//! Each game is independent: its own session, its own `StdRng`. Games run
//! on the rayon pool; results are folded into a `SimulationReport`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::guesser::GuessError;
use crate::session::{GuessSession, Secret};
use crate::types::{Direction, GuessBounds, Outcome, SessionOptions, SimulationConfig, SimulationReport};

/// Play one game to the end, answering every guess truthfully.
///
/// Returns the number of rounds the opponent needed.
pub fn play_truthfully<R: Rng>(
    secret: Secret,
    bounds: GuessBounds,
    options: SessionOptions,
    rng: R,
) -> Result<u32, GuessError> {
    let mut session = GuessSession::start(secret, bounds, options, rng)?;

    loop {
        let guess = session.current_guess();
        let Some(direction) = Direction::truthful(guess, secret.value()) else {
            return Ok(session.rounds_played());
        };
        if let Outcome::Finished { rounds } = session.submit_feedback(direction)? {
            return Ok(rounds);
        }
    }
}

/// Random source for game `index`: `seed + index` when seeded.
pub fn game_rng<R: SeedableRng>(seed: Option<u64>, index: usize) -> R {
    match seed {
        Some(s) => R::seed_from_u64(s.wrapping_add(index as u64)),
        None => R::from_entropy(),
    }
}

/// Play game number `index` of a run.
pub fn simulate_game(config: &SimulationConfig, index: usize) -> Result<u32, String> {
    let mut rng: StdRng = game_rng(config.seed, index);
    let value = match config.secret {
        Some(v) => v,
        None => rng.gen_range(config.bounds.low..config.bounds.high),
    };
    let secret = Secret::new(value, config.bounds).map_err(|e| e.to_string())?;

    let rounds =
        play_truthfully(secret, config.bounds, config.options, rng).map_err(|e| e.to_string())?;
    debug!(index, secret = value, rounds, "game finished");
    Ok(rounds)
}

/// Run every game of `config` in parallel, without progress reporting.
pub fn simulate(config: &SimulationConfig) -> SimulationReport {
    let results: Vec<_> = (0..config.games)
        .into_par_iter()
        .map(|i| (i, simulate_game(config, i)))
        .collect();

    assemble_report(results)
}

/// Fold per-game results into a report.
pub fn assemble_report(results: Vec<(usize, Result<u32, String>)>) -> SimulationReport {
    let mut report = SimulationReport::default();
    let mut total: u64 = 0;

    for (index, result) in results {
        match result {
            Ok(rounds) => {
                report.games_played += 1;
                total += u64::from(rounds);
                *report.histogram.entry(rounds).or_insert(0) += 1;
                report.min_rounds = Some(report.min_rounds.map_or(rounds, |m| m.min(rounds)));
                report.max_rounds = Some(report.max_rounds.map_or(rounds, |m| m.max(rounds)));
            }
            Err(e) => {
                warn!(index, error = %e, "game failed");
                report.failures.push((index, e));
            }
        }
    }

    report.failures.sort_by_key(|(index, _)| *index);
    if report.games_played > 0 {
        report.mean_rounds = total as f64 / report.games_played as f64;
    }

    report
}

// ============================================================================
// TESTS
// ============================================================================
