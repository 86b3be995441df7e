//! One game from confirmed secret to the opponent's final guess.
//!
//! A `GuessSession` owns everything a game needs: the secret, the guesser
//! and its random source. The controller that creates it owns it and hands
//! it to event handlers by `&mut`. Nothing here is global.

use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::guesser::{GuessError, RangeGuesser};
use crate::types::{Direction, GuessBounds, Outcome, Phase, SessionOptions};

// ============================================================================
// SECRET INPUT
// ============================================================================

/// Why a typed secret was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// Nothing but non-digits was entered.
    NotANumber,
    /// Parsed, but outside the playable range.
    OutOfRange { value: u32, low: u32, high: u32 },
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretError::NotANumber => write!(f, "Not a number"),
            SecretError::OutOfRange { value, low, high } => write!(
                f,
                "{} is out of range: number has to be between {} and {}",
                value,
                low,
                high - 1
            ),
        }
    }
}

impl std::error::Error for SecretError {}

/// Keep only ASCII digits, no more than the largest secret of `bounds` has.
pub fn sanitize_input(raw: &str, bounds: &GuessBounds) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(bounds.input_len())
        .collect()
}

/// A number the player may legally pick for the given bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secret(u32);

impl Secret {
    pub fn new(value: u32, bounds: GuessBounds) -> Result<Secret, SecretError> {
        if bounds.contains(value) {
            Ok(Secret(value))
        } else {
            Err(SecretError::OutOfRange {
                value,
                low: bounds.low,
                high: bounds.high,
            })
        }
    }

    /// Parse typed input. Non-digits are dropped before parsing.
    pub fn parse(input: &str, bounds: GuessBounds) -> Result<Secret, SecretError> {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(SecretError::NotANumber);
        }
        // Anything too long for u32 is out of range anyway.
        let value = digits.parse::<u32>().unwrap_or(u32::MAX);
        Secret::new(value, bounds)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// A running (or finished) game.
#[derive(Debug, Clone)]
pub struct GuessSession<R = StdRng> {
    secret: Secret,
    guesser: RangeGuesser<R>,
    phase: Phase,
    honesty_check: bool,
}

impl<R: Rng> GuessSession<R> {
    /// Begin a game. The first guess never equals the secret.
    pub fn start(
        secret: Secret,
        bounds: GuessBounds,
        options: SessionOptions,
        rng: R,
    ) -> Result<Self, GuessError> {
        let guesser =
            RangeGuesser::initialize(bounds, secret.value(), options.max_resample_attempts, rng)?;
        debug!(
            secret = secret.value(),
            first_guess = guesser.current_guess(),
            "session started"
        );

        Ok(GuessSession {
            secret,
            guesser,
            phase: Phase::Active,
            honesty_check: options.honesty_check,
        })
    }

    /// Advance one round with the player's hint about the current guess.
    ///
    /// A finished session ignores further hints and keeps reporting its
    /// round count.
    pub fn submit_feedback(&mut self, direction: Direction) -> Result<Outcome, GuessError> {
        if self.phase == Phase::Finished {
            return Ok(Outcome::Finished {
                rounds: self.rounds_played(),
            });
        }

        let guess = self.guesser.current_guess();
        if self.honesty_check && direction.contradicts(guess, self.secret.value()) {
            debug!(%direction, guess, "hint contradicts the secret");
            return Err(GuessError::InconsistentFeedback { direction, guess });
        }

        let next = self.guesser.feedback(direction)?;
        debug!(%direction, guess, next, rounds = self.rounds_played(), "round played");

        if next == self.secret.value() {
            self.phase = Phase::Finished;
            return Ok(Outcome::Finished {
                rounds: self.rounds_played(),
            });
        }

        Ok(Outcome::Guess(next))
    }

    pub fn rounds_played(&self) -> u32 {
        self.guesser.rounds()
    }

    pub fn current_guess(&self) -> u32 {
        self.guesser.current_guess()
    }

    pub fn secret(&self) -> u32 {
        self.secret.value()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

// ============================================================================
// TESTS
// ============================================================================
