//! guess-duel: pick a secret number and watch the computer bisect its way to it.

pub mod config;
pub mod guesser;
pub mod report;
pub mod session;
pub mod simulate;
pub mod tui;
pub mod types;
