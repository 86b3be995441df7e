//! TUI state algebra: pure types, zero effects.
//!
//! Screen variants carry only per-screen transient state (typed input,
//! pending alert). The game itself, the `GuessSession`, lives in `App`
//! and is only ever touched by effect handlers.

use crossterm::event::KeyEvent;
use rand::rngs::StdRng;

use crate::session::GuessSession;
use crate::types::{GuessBounds, SessionOptions};

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// The terminal was resized; redraw.
    Resize,
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model, generic over the opponent's random source.
#[derive(Debug)]
pub struct App<R = StdRng> {
    /// Current screen — carries per-screen input/alert state.
    pub screen: Screen,

    /// The game in progress. None on the start screen.
    pub session: Option<GuessSession<R>>,

    /// Range every new session plays over.
    pub bounds: GuessBounds,

    pub options: SessionOptions,

    /// Seed for the next session; bumped after each one.
    pub seed: Option<u64>,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

// ============================================================================
// SCREENS
// ============================================================================

/// The current TUI screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Pick a secret.
    StartGame {
        /// Digits typed so far.
        input: String,
        /// Secret accepted by Enter, shown as "You selected".
        confirmed: Option<u32>,
        alert: Option<Alert>,
    },

    /// The opponent guesses. Guess and round count come from App.session.
    Game { alert: Option<Alert> },

    /// The opponent found the secret.
    GameOver { rounds: u32, secret: u32 },
}

/// Default screen is an empty start screen (placeholder during transitions).
impl Default for Screen {
    fn default() -> Self {
        Screen::start_game()
    }
}

/// Modal notice shown over a screen until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Typed secret rejected; dismissing clears the input.
    InvalidNumber { message: String },
    /// The hint contradicts the secret or earlier hints.
    DontLie,
    /// The guesser ran out of candidates.
    Stuck { message: String },
}

impl Alert {
    pub fn title(&self) -> &'static str {
        match self {
            Alert::InvalidNumber { .. } => "Invalid number!",
            Alert::DontLie => "Don't lie!",
            Alert::Stuck { .. } => "Stuck!",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Alert::InvalidNumber { message } | Alert::Stuck { message } => message,
            Alert::DontLie => "You know that this is wrong...",
        }
    }

    /// Label of the dismiss button.
    pub fn dismiss_label(&self) -> &'static str {
        match self {
            Alert::InvalidNumber { .. } => "Okay",
            Alert::DontLie => "Sorry!",
            Alert::Stuck { .. } => "Back",
        }
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A digit typed into the number field.
    Digit(u8),
    /// Delete the last typed digit.
    Backspace,
    /// Clear input and selection.
    Reset,
    /// Confirm / start / dismiss / play again, depending on screen.
    Enter,
    /// Abandon the round or dismiss an alert.
    Back,
    /// The secret is lower than the guess.
    Lower,
    /// The secret is greater than the guess.
    Greater,
    /// Quit the application.
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Render this screen (may be the same or a different screen).
    Screen(Screen),
    /// Quit the application.
    Quit,
    /// Execute a side effect that touches the session.
    Effect(Effect),
}

/// Side effect requested by a pure transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Create a session for the confirmed secret.
    StartSession { secret: u32 },
    /// Forward the player's hint to the session.
    Feedback(crate::types::Direction),
    /// Drop the session and return to the start screen.
    EndSession,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl App {
    /// An App on the start screen with no game running.
    pub fn new(bounds: GuessBounds, options: SessionOptions, seed: Option<u64>) -> Self {
        App {
            screen: Screen::start_game(),
            session: None,
            bounds,
            options,
            seed,
            should_quit: false,
        }
    }
}

impl Screen {
    /// Empty start screen.
    pub fn start_game() -> Self {
        Screen::StartGame {
            input: String::new(),
            confirmed: None,
            alert: None,
        }
    }

    /// Game screen without an alert.
    pub fn game() -> Self {
        Screen::Game { alert: None }
    }
}

// ============================================================================
// TESTS
// ============================================================================
