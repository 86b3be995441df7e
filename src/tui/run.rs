//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module that touches the terminal. It wires the pure
//! layers (state, update, view) to crossterm and ratatui.
//!
//! A key reader thread forwards crossterm events into an mpsc channel; the
//! event loop consumes them one at a time, so every hint is fully handled
//! before the next key is read.

use std::io;
use std::sync::mpsc;
use std::thread;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use super::state::{Action, App, AppEvent, Transition};
use super::update::{apply_effect, update};
use super::view::render;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        // Number entry
        KeyCode::Char(c @ '0'..='9') => Some(Action::Digit(c as u8 - b'0')),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char('r') => Some(Action::Reset),

        // Hints
        KeyCode::Char('-') | KeyCode::Char('l') | KeyCode::Down | KeyCode::Left => {
            Some(Action::Lower)
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('g') | KeyCode::Up
        | KeyCode::Right => Some(Action::Greater),

        // Navigation
        KeyCode::Enter => Some(Action::Enter),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('q') => Some(Action::Quit),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards them to the channel.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            let forwarded = match event::read() {
                // Windows reports releases too; only presses count
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(AppEvent::Key(key))
                }
                Ok(Event::Resize(..)) => tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(_) => break,
            };
            if forwarded.is_err() {
                break; // receiver dropped, TUI is shutting down
            }
        }
    });
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI event loop until the user quits.
pub fn run(mut app: App) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    info!("tui started");

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_key_reader(tx);

    loop {
        terminal.draw(|frame| render(&app, frame))?;

        if app.should_quit {
            break;
        }

        // Block on next event from the reader thread
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => break, // reader exited
        };

        match event {
            AppEvent::Key(key) => {
                let Some(action) = map_key(key) else {
                    continue;
                };
                debug!(?action, "key");

                let screen = std::mem::take(&mut app.screen);
                match update(screen, &action, &app.bounds) {
                    Transition::Screen(new_screen) => app.screen = new_screen,
                    Transition::Quit => app.should_quit = true,
                    Transition::Effect(effect) => apply_effect(&mut app, effect),
                }
            }
            AppEvent::Resize => {} // redraw on next iteration
        }
    }

    restore_terminal()?;
    info!("tui stopped");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Action::Quit));
    }

    #[test]
    fn digits_map_to_digit_actions() {
        for n in 0..=9u8 {
            let k = key(KeyCode::Char((b'0' + n) as char));
            assert_eq!(map_key(k), Some(Action::Digit(n)));
        }
    }

    #[test]
    fn minus_and_plus_map_to_hints() {
        assert_eq!(map_key(key(KeyCode::Char('-'))), Some(Action::Lower));
        assert_eq!(map_key(key(KeyCode::Char('+'))), Some(Action::Greater));
        assert_eq!(map_key(key(KeyCode::Down)), Some(Action::Lower));
        assert_eq!(map_key(key(KeyCode::Up)), Some(Action::Greater));
    }

    #[test]
    fn editing_keys_map() {
        assert_eq!(map_key(key(KeyCode::Backspace)), Some(Action::Backspace));
        assert_eq!(map_key(key(KeyCode::Char('r'))), Some(Action::Reset));
    }

    #[test]
    fn enter_and_esc_map() {
        assert_eq!(map_key(key(KeyCode::Enter)), Some(Action::Enter));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Action::Back));
    }

    #[test]
    fn unmapped_key_returns_none() {
        assert_eq!(map_key(key(KeyCode::Char('z'))), None);
    }
}
