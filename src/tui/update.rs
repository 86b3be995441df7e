//! Pure state transitions: (Screen, Action) → Transition.
//!
//! Each screen defines which actions it accepts. Unhandled actions return
//! the current screen unchanged (no-op). Anything that touches the session
//! is described as an `Effect` and carried out by `apply_effect`.

use rand::{Rng, SeedableRng};
use tracing::info;

use crate::guesser::GuessError;
use crate::session::{GuessSession, Secret, sanitize_input};
use crate::simulate::game_rng;
use crate::types::{Direction, GuessBounds, Outcome};

use super::state::{Action, Alert, App, Effect, Screen, Transition};

/// Pure state transition function.
///
/// `bounds` is read-only context for validating the typed secret.
pub fn update(screen: Screen, action: &Action, bounds: &GuessBounds) -> Transition {
    match screen {
        Screen::StartGame {
            input,
            confirmed,
            alert,
        } => match alert {
            Some(alert) => update_start_alert(input, confirmed, alert, action),
            None => update_start_game(input, confirmed, action, bounds),
        },
        Screen::Game { alert } => update_game(alert, action),
        Screen::GameOver { .. } => update_game_over(screen, action),
    }
}

// ============================================================================
// PER-SCREEN HANDLERS
// ============================================================================

/// Start screen: typing, reset, confirm, then start.
fn update_start_game(
    input: String,
    confirmed: Option<u32>,
    action: &Action,
    bounds: &GuessBounds,
) -> Transition {
    match action {
        Action::Digit(d) => {
            let typed = format!("{}{}", input, d);
            Transition::Screen(Screen::StartGame {
                input: sanitize_input(&typed, bounds),
                confirmed,
                alert: None,
            })
        }
        Action::Backspace => {
            let mut input = input;
            input.pop();
            Transition::Screen(Screen::StartGame {
                input,
                confirmed,
                alert: None,
            })
        }
        Action::Reset => Transition::Screen(Screen::start_game()),
        Action::Enter => {
            // Empty field with a confirmed number means "START GAME!"
            if input.is_empty() {
                if let Some(secret) = confirmed {
                    return Transition::Effect(Effect::StartSession { secret });
                }
            }
            match Secret::parse(&input, *bounds) {
                Ok(secret) => Transition::Screen(Screen::StartGame {
                    input: String::new(),
                    confirmed: Some(secret.value()),
                    alert: None,
                }),
                Err(_) => Transition::Screen(Screen::StartGame {
                    input,
                    confirmed,
                    alert: Some(invalid_number_alert(bounds)),
                }),
            }
        }
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::StartGame {
            input,
            confirmed,
            alert: None,
        }),
    }
}

/// Start screen with an alert up: only dismiss or quit.
fn update_start_alert(
    input: String,
    confirmed: Option<u32>,
    alert: Alert,
    action: &Action,
) -> Transition {
    match action {
        Action::Enter | Action::Back => match alert {
            Alert::InvalidNumber { .. } => Transition::Screen(Screen::start_game()),
            _ => Transition::Screen(Screen::StartGame {
                input,
                confirmed,
                alert: None,
            }),
        },
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::StartGame {
            input,
            confirmed,
            alert: Some(alert),
        }),
    }
}

/// Game screen: hints go to the session; Esc abandons the round.
fn update_game(alert: Option<Alert>, action: &Action) -> Transition {
    if alert.is_some() {
        return match action {
            Action::Enter | Action::Back => Transition::Screen(Screen::game()),
            Action::Quit => Transition::Quit,
            _ => Transition::Screen(Screen::Game { alert }),
        };
    }

    match action {
        Action::Lower => Transition::Effect(Effect::Feedback(Direction::Lower)),
        Action::Greater => Transition::Effect(Effect::Feedback(Direction::Greater)),
        Action::Back => Transition::Effect(Effect::EndSession),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(Screen::game()),
    }
}

/// Game over: Enter starts a new game.
fn update_game_over(screen: Screen, action: &Action) -> Transition {
    match action {
        Action::Enter => Transition::Effect(Effect::EndSession),
        Action::Quit => Transition::Quit,
        _ => Transition::Screen(screen),
    }
}

fn invalid_number_alert(bounds: &GuessBounds) -> Alert {
    Alert::InvalidNumber {
        message: format!(
            "Number has to be between {} and {}.",
            bounds.low,
            bounds.max_secret()
        ),
    }
}

// ============================================================================
// EFFECTS
// ============================================================================

/// Carry out an effect against the App's session and pick the next screen.
///
/// No terminal I/O happens here, so this is testable like `update`.
pub fn apply_effect<R: Rng + SeedableRng>(app: &mut App<R>, effect: Effect) {
    match effect {
        Effect::StartSession { secret } => start_session(app, secret),
        Effect::Feedback(direction) => submit_feedback(app, direction),
        Effect::EndSession => {
            app.session = None;
            app.screen = Screen::start_game();
        }
    }
}

fn start_session<R: Rng + SeedableRng>(app: &mut App<R>, value: u32) {
    let secret = match Secret::new(value, app.bounds) {
        Ok(s) => s,
        Err(_) => {
            app.screen = Screen::StartGame {
                input: String::new(),
                confirmed: None,
                alert: Some(invalid_number_alert(&app.bounds)),
            };
            return;
        }
    };

    let rng: R = game_rng(app.seed, 0);
    app.seed = app.seed.map(|s| s.wrapping_add(1));

    match GuessSession::start(secret, app.bounds, app.options, rng) {
        Ok(session) => {
            info!(secret = value, "game started");
            app.session = Some(session);
            app.screen = Screen::game();
        }
        Err(e) => {
            app.screen = Screen::StartGame {
                input: String::new(),
                confirmed: Some(value),
                alert: Some(Alert::Stuck {
                    message: e.to_string(),
                }),
            };
        }
    }
}

fn submit_feedback<R: Rng>(app: &mut App<R>, direction: Direction) {
    let Some(session) = app.session.as_mut() else {
        app.screen = Screen::start_game();
        return;
    };

    app.screen = match session.submit_feedback(direction) {
        Ok(Outcome::Guess(_)) => Screen::game(),
        Ok(Outcome::Finished { rounds }) => {
            info!(rounds, secret = session.secret(), "game over");
            Screen::GameOver {
                rounds,
                secret: session.secret(),
            }
        }
        Err(GuessError::InconsistentFeedback { .. }) => Screen::Game {
            alert: Some(Alert::DontLie),
        },
        Err(e @ GuessError::DegenerateRange { .. }) => Screen::Game {
            alert: Some(Alert::Stuck {
                message: e.to_string(),
            }),
        },
    };
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::types::{Phase, SessionOptions};

    /// Always draws zero, so every `gen_range` lands on its lower end.
    #[derive(Debug)]
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    impl SeedableRng for ZeroRng {
        type Seed = [u8; 8];

        fn from_seed(_seed: Self::Seed) -> Self {
            ZeroRng
        }
    }

    fn bounds() -> GuessBounds {
        GuessBounds::default()
    }

    fn start(input: &str, confirmed: Option<u32>) -> Screen {
        Screen::StartGame {
            input: input.to_string(),
            confirmed,
            alert: None,
        }
    }

    fn app_in_game(secret: u32, seed: u64) -> App {
        let mut app = App::new(bounds(), SessionOptions::default(), Some(seed));
        apply_effect(&mut app, Effect::StartSession { secret });
        app
    }

    // -- StartGame --

    #[test]
    fn digits_accumulate_up_to_two() {
        let t = update(start("4", None), &Action::Digit(2), &bounds());
        assert_eq!(t, Transition::Screen(start("42", None)));

        let t = update(start("42", None), &Action::Digit(7), &bounds());
        assert_eq!(t, Transition::Screen(start("42", None)));
    }

    #[test]
    fn backspace_removes_last_digit() {
        let t = update(start("42", Some(7)), &Action::Backspace, &bounds());
        assert_eq!(t, Transition::Screen(start("4", Some(7))));
    }

    #[test]
    fn reset_clears_input_and_selection() {
        let t = update(start("42", Some(7)), &Action::Reset, &bounds());
        assert_eq!(t, Transition::Screen(Screen::start_game()));
    }

    #[test]
    fn wide_range_accepts_three_digit_secret() {
        let cfg = config::parse("[game]\nhigh = 1000\n").unwrap();
        let wide = cfg.bounds();

        let mut screen = Screen::start_game();
        for d in [5, 0, 0, 7] {
            screen = match update(screen, &Action::Digit(d), &wide) {
                Transition::Screen(s) => s,
                other => panic!("Expected screen, got {:?}", other),
            };
        }
        assert_eq!(screen, start("500", None));

        let t = update(screen, &Action::Enter, &wide);
        assert_eq!(t, Transition::Screen(start("", Some(500))));
    }

    #[test]
    fn enter_confirms_valid_number() {
        let t = update(start("42", None), &Action::Enter, &bounds());
        assert_eq!(t, Transition::Screen(start("", Some(42))));
    }

    #[test]
    fn enter_on_zero_raises_invalid_number() {
        let t = update(start("0", None), &Action::Enter, &bounds());
        match t {
            Transition::Screen(Screen::StartGame {
                alert: Some(Alert::InvalidNumber { message }),
                ..
            }) => assert_eq!(message, "Number has to be between 1 and 99."),
            other => panic!("Expected invalid number alert, got {:?}", other),
        }
    }

    #[test]
    fn enter_on_empty_field_without_selection_is_invalid() {
        let t = update(start("", None), &Action::Enter, &bounds());
        assert!(matches!(
            t,
            Transition::Screen(Screen::StartGame {
                alert: Some(Alert::InvalidNumber { .. }),
                ..
            })
        ));
    }

    #[test]
    fn enter_with_selection_starts_session() {
        let t = update(start("", Some(42)), &Action::Enter, &bounds());
        assert_eq!(t, Transition::Effect(Effect::StartSession { secret: 42 }));
    }

    #[test]
    fn dismissing_invalid_number_resets_input() {
        let screen = Screen::StartGame {
            input: "0".into(),
            confirmed: Some(5),
            alert: Some(invalid_number_alert(&bounds())),
        };
        let t = update(screen, &Action::Enter, &bounds());
        assert_eq!(t, Transition::Screen(Screen::start_game()));
    }

    #[test]
    fn alert_swallows_other_keys() {
        let screen = Screen::StartGame {
            input: "0".into(),
            confirmed: None,
            alert: Some(invalid_number_alert(&bounds())),
        };
        let t = update(screen.clone(), &Action::Digit(3), &bounds());
        assert_eq!(t, Transition::Screen(screen));
    }

    #[test]
    fn quit_works_everywhere() {
        for screen in [
            Screen::start_game(),
            Screen::game(),
            Screen::Game {
                alert: Some(Alert::DontLie),
            },
            Screen::GameOver {
                rounds: 3,
                secret: 9,
            },
        ] {
            assert_eq!(update(screen, &Action::Quit, &bounds()), Transition::Quit);
        }
    }

    // -- Game --

    #[test]
    fn hints_become_feedback_effects() {
        assert_eq!(
            update(Screen::game(), &Action::Lower, &bounds()),
            Transition::Effect(Effect::Feedback(Direction::Lower))
        );
        assert_eq!(
            update(Screen::game(), &Action::Greater, &bounds()),
            Transition::Effect(Effect::Feedback(Direction::Greater))
        );
    }

    #[test]
    fn hints_are_ignored_while_alert_is_up() {
        let screen = Screen::Game {
            alert: Some(Alert::DontLie),
        };
        let t = update(screen.clone(), &Action::Lower, &bounds());
        assert_eq!(t, Transition::Screen(screen));
    }

    #[test]
    fn enter_dismisses_game_alert() {
        let screen = Screen::Game {
            alert: Some(Alert::DontLie),
        };
        assert_eq!(
            update(screen, &Action::Enter, &bounds()),
            Transition::Screen(Screen::game())
        );
    }

    #[test]
    fn back_abandons_round() {
        assert_eq!(
            update(Screen::game(), &Action::Back, &bounds()),
            Transition::Effect(Effect::EndSession)
        );
    }

    // -- GameOver --

    #[test]
    fn enter_on_game_over_starts_new_game() {
        let screen = Screen::GameOver {
            rounds: 4,
            secret: 12,
        };
        assert_eq!(
            update(screen, &Action::Enter, &bounds()),
            Transition::Effect(Effect::EndSession)
        );
    }

    // -- Effects --

    #[test]
    fn start_session_enters_game_screen() {
        let app = app_in_game(60, 1);
        assert_eq!(app.screen, Screen::game());
        let session = app.session.as_ref().unwrap();
        assert_ne!(session.current_guess(), 60);
        assert_eq!(app.seed, Some(2));
    }

    #[test]
    fn lying_raises_dont_lie_alert() {
        let mut app = app_in_game(60, 3);
        let guess = app.session.as_ref().unwrap().current_guess();
        let lie = if guess < 60 {
            Direction::Lower
        } else {
            Direction::Greater
        };

        apply_effect(&mut app, Effect::Feedback(lie));
        assert_eq!(
            app.screen,
            Screen::Game {
                alert: Some(Alert::DontLie)
            }
        );
        assert_eq!(app.session.as_ref().unwrap().rounds_played(), 0);
    }

    #[test]
    fn truthful_hints_reach_game_over() {
        let mut app = app_in_game(37, 9);
        loop {
            let session = app.session.as_ref().unwrap();
            if session.phase() == Phase::Finished {
                break;
            }
            let direction = Direction::truthful(session.current_guess(), 37).unwrap();
            apply_effect(&mut app, Effect::Feedback(direction));
        }

        let rounds = app.session.as_ref().unwrap().rounds_played();
        assert_eq!(app.screen, Screen::GameOver { rounds, secret: 37 });
    }

    #[test]
    fn exhausted_redraws_raise_stuck_alert() {
        let mut app: App<ZeroRng> = App {
            screen: Screen::start_game(),
            session: None,
            bounds: bounds(),
            options: SessionOptions::default(),
            seed: Some(0),
            should_quit: false,
        };
        apply_effect(&mut app, Effect::StartSession { secret: 50 });
        assert_eq!(app.session.as_ref().unwrap().current_guess(), 1);

        // Every redraw lands on 1 again, the value just ruled out.
        apply_effect(&mut app, Effect::Feedback(Direction::Greater));
        assert!(matches!(
            app.screen,
            Screen::Game {
                alert: Some(Alert::Stuck { .. })
            }
        ));
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.current_guess(), 1);
        assert_eq!(session.rounds_played(), 0);
        assert_eq!(session.phase(), Phase::Active);
    }

    #[test]
    fn end_session_drops_game() {
        let mut app = app_in_game(10, 4);
        apply_effect(&mut app, Effect::EndSession);
        assert!(app.session.is_none());
        assert_eq!(app.screen, Screen::start_game());
    }

    #[test]
    fn feedback_without_session_returns_to_start() {
        let mut app = App::new(bounds(), SessionOptions::default(), None);
        app.screen = Screen::game();
        apply_effect(&mut app, Effect::Feedback(Direction::Lower));
        assert_eq!(app.screen, Screen::start_game());
    }
}
