//! The opponent: random bisection over a shrinking integer range.
//!
//! The guesser never sees the secret. It keeps a sampling range
//! `[low, high)`, moves one end onto the current guess on every hint, and
//! draws the next guess from what is left, never repeating the previous one.
//!
//! Contradiction detection is partial by nature: the guesser can only tell
//! that a hint is impossible given the hints it has already accepted. A lie
//! that is still consistent with that history goes unnoticed.

use std::fmt;

use rand::Rng;

use crate::types::{Direction, GuessBounds};

// ============================================================================
// ERRORS
// ============================================================================

/// Recoverable conditions raised by the guesser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessError {
    /// The hint contradicts hints already accepted. State is unchanged.
    InconsistentFeedback { direction: Direction, guess: u32 },

    /// Nothing left to draw from once the excluded value is removed.
    DegenerateRange { low: u32, high: u32, exclude: u32 },
}

impl fmt::Display for GuessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuessError::InconsistentFeedback { direction, guess } => {
                write!(
                    f,
                    "\"{}\" than {} contradicts earlier hints",
                    direction, guess
                )
            }
            GuessError::DegenerateRange { low, high, exclude } => {
                write!(
                    f,
                    "No candidate left in [{}, {}) excluding {}",
                    low, high, exclude
                )
            }
        }
    }
}

impl std::error::Error for GuessError {}

// ============================================================================
// SAMPLING
// ============================================================================

/// Draw `g` with `low <= g < high` and `g != exclude`.
///
/// A single-value range is returned as is unless it is the excluded value.
/// Otherwise draws are repeated at most `max_attempts` times.
pub fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    low: u32,
    high: u32,
    exclude: u32,
    max_attempts: u32,
) -> Result<u32, GuessError> {
    let degenerate = GuessError::DegenerateRange { low, high, exclude };

    if high <= low {
        return Err(degenerate);
    }

    if high - low == 1 {
        return if low == exclude { Err(degenerate) } else { Ok(low) };
    }

    for _ in 0..max_attempts {
        let g = rng.gen_range(low..high);
        if g != exclude {
            return Ok(g);
        }
    }

    Err(degenerate)
}

// ============================================================================
// GUESSER
// ============================================================================

/// Stateful bisection guesser.
///
/// `floor` is the smallest candidate still consistent with accepted hints.
/// The largest is always `high - 1`, since only `Lower` moves `high`.
#[derive(Debug, Clone)]
pub struct RangeGuesser<R> {
    low: u32,
    high: u32,
    floor: u32,
    current: u32,
    rounds: u32,
    max_attempts: u32,
    rng: R,
}

impl<R: Rng> RangeGuesser<R> {
    /// Start over `bounds` and draw a first guess other than `exclude`.
    pub fn initialize(
        bounds: GuessBounds,
        exclude: u32,
        max_attempts: u32,
        mut rng: R,
    ) -> Result<Self, GuessError> {
        let current = sample(&mut rng, bounds.low, bounds.high, exclude, max_attempts)?;

        Ok(RangeGuesser {
            low: bounds.low,
            high: bounds.high,
            floor: bounds.low,
            current,
            rounds: 0,
            max_attempts,
            rng,
        })
    }

    /// Apply a hint about the current guess and draw the next one.
    ///
    /// On error nothing changes: range, guess and round count stay put.
    pub fn feedback(&mut self, direction: Direction) -> Result<u32, GuessError> {
        let guess = self.current;

        let consistent = match direction {
            Direction::Lower => guess > self.floor,
            Direction::Greater => guess.saturating_add(1) < self.high,
        };
        if !consistent {
            return Err(GuessError::InconsistentFeedback { direction, guess });
        }

        let (low, high) = match direction {
            Direction::Lower => (self.low, guess),
            Direction::Greater => (guess, self.high),
        };
        let next = sample(&mut self.rng, low, high, guess, self.max_attempts)?;

        if direction == Direction::Greater {
            self.floor = self.floor.max(guess + 1);
        }
        self.low = low;
        self.high = high;
        self.current = next;
        self.rounds += 1;

        Ok(next)
    }

    pub fn current_guess(&self) -> u32 {
        self.current
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    /// Accepted hints so far.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

// ============================================================================
// TESTS
// ============================================================================
