//! Domain types for guess-duel.
//!
//! Plain data shared by the core, the simulator and the UI layers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest number a player may pick.
pub const DEFAULT_LOW: u32 = 1;

/// Exclusive upper sentinel of the sampling range (largest secret is 99).
pub const DEFAULT_HIGH: u32 = 100;

/// Redraws allowed before sampling gives up with `DegenerateRange`.
pub const DEFAULT_MAX_RESAMPLE_ATTEMPTS: u32 = 32;

// ============================================================================
// ENUMS
// ============================================================================

/// Directional hint given by the human about the last guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The secret is below the current guess.
    Lower,
    /// The secret is above the current guess.
    Greater,
}

impl Direction {
    /// The hint a truthful player gives for `guess` when the secret is `secret`.
    ///
    /// Returns None when the guess is correct (no hint applies).
    pub fn truthful(guess: u32, secret: u32) -> Option<Direction> {
        match secret.cmp(&guess) {
            std::cmp::Ordering::Less => Some(Direction::Lower),
            std::cmp::Ordering::Greater => Some(Direction::Greater),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Whether this hint about `guess` contradicts the real `secret`.
    pub fn contradicts(self, guess: u32, secret: u32) -> bool {
        match self {
            Direction::Lower => guess < secret,
            Direction::Greater => guess > secret,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Lower => write!(f, "lower"),
            Direction::Greater => write!(f, "greater"),
        }
    }
}

/// Lifecycle of a session. No transition leads back from `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Active,
    Finished,
}

/// What a session reports after accepting a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The opponent's next guess; the game goes on.
    Guess(u32),
    /// The opponent hit the secret after `rounds` rounds.
    Finished { rounds: u32 },
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable pretty output.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// STRUCTS
// ============================================================================

/// Sampling range for a game: `low` inclusive, `high` exclusive.
///
/// Valid secrets are `low..high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessBounds {
    pub low: u32,
    pub high: u32,
}

impl Default for GuessBounds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
        }
    }
}

impl GuessBounds {
    /// Positive lower bound and room for at least two candidates.
    pub fn is_valid(&self) -> bool {
        self.low >= 1 && self.low.saturating_add(1) < self.high
    }

    /// Whether `value` is a legal secret for these bounds.
    pub fn contains(&self, value: u32) -> bool {
        (self.low..self.high).contains(&value)
    }

    /// Largest legal secret.
    pub fn max_secret(&self) -> u32 {
        self.high - 1
    }

    /// Digits needed to type the largest legal secret.
    pub fn input_len(&self) -> usize {
        self.max_secret().to_string().len()
    }
}

/// Per-session tuning, taken from the `[game]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Redraws allowed when a draw hits the excluded value.
    pub max_resample_attempts: u32,
    /// Reject hints that contradict the real secret before the guesser sees them.
    pub honesty_check: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_resample_attempts: DEFAULT_MAX_RESAMPLE_ATTEMPTS,
            honesty_check: true,
        }
    }
}

/// Configuration for a batch simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub bounds: GuessBounds,
    pub options: SessionOptions,
    /// Number of games to play.
    pub games: usize,
    /// Fixed secret for every game (None = draw one per game).
    pub secret: Option<u32>,
    /// Base seed; game `i` uses `seed + i`. None = entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            bounds: GuessBounds::default(),
            options: SessionOptions::default(),
            games: 1000,
            secret: None,
            seed: None,
        }
    }
}

/// Aggregated results of a simulation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationReport {
    /// Games that ended with the secret guessed.
    pub games_played: usize,
    /// Games that stopped on an error (game index, message).
    pub failures: Vec<(usize, String)>,
    /// Fewest rounds needed by any game.
    pub min_rounds: Option<u32>,
    /// Most rounds needed by any game.
    pub max_rounds: Option<u32>,
    /// Mean rounds over finished games.
    pub mean_rounds: f64,
    /// Rounds → number of games that needed exactly that many.
    pub histogram: BTreeMap<u32, usize>,
}

// ============================================================================
// TESTS
// ============================================================================
