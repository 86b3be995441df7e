//! Interactive terminal game.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: pure data types (Screen, Action, Transition)
//! - `update`: pure transitions, plus effect handlers that touch the session
//! - `view`: pure rendering
//! - `run`: terminal effects and the event loop

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::run;
pub use state::App;
