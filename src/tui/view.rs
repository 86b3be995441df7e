//! Pure rendering: map App state to ratatui widget trees.
//!
//! Each screen has a dedicated render function. The main `render()`
//! dispatches on the current Screen variant; an alert, if any, is drawn
//! as a centered box on top.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::types::GuessBounds;

use super::state::{Alert, App, Screen};
use super::theme;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current screen to the terminal frame.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Common layout: title bar at top, content in middle, help at bottom
    let chunks = Layout::vertical([
        Constraint::Length(1), // title
        Constraint::Min(0),    // content
        Constraint::Length(1), // help
    ])
    .split(area);

    frame.render_widget(render_title(&app.screen), chunks[0]);
    frame.render_widget(render_help(&app.screen), chunks[2]);

    let content_area = chunks[1];

    match &app.screen {
        Screen::StartGame {
            input,
            confirmed,
            alert,
        } => {
            render_start_game(input, *confirmed, &app.bounds, frame, content_area);
            if let Some(alert) = alert {
                render_alert(alert, frame, content_area);
            }
        }
        Screen::Game { alert } => {
            match &app.session {
                Some(session) => render_game(
                    session.current_guess(),
                    session.rounds_played(),
                    frame,
                    content_area,
                ),
                None => {
                    let err = Paragraph::new("No game in progress").style(theme::STYLE_DANGER);
                    frame.render_widget(err, content_area);
                }
            }
            if let Some(alert) = alert {
                render_alert(alert, frame, content_area);
            }
        }
        Screen::GameOver { rounds, secret } => {
            render_game_over(*rounds, *secret, frame, content_area);
        }
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

/// Title bar showing the app name and screen-specific context.
fn render_title(screen: &Screen) -> Paragraph<'static> {
    let title_text = match screen {
        Screen::StartGame { .. } => "Start a new game!",
        Screen::Game { .. } => "Opponent's guess",
        Screen::GameOver { .. } => "The game is over!",
    };

    Paragraph::new(Line::from(vec![
        Span::styled("guess-duel", theme::STYLE_TITLE),
        Span::styled(format!("  ·  {}", title_text), theme::STYLE_DIM),
    ]))
}

/// Help line showing available keybindings for the current screen.
fn render_help(screen: &Screen) -> Paragraph<'static> {
    let help_text = match screen {
        Screen::StartGame { alert: Some(_), .. } | Screen::Game { alert: Some(_) } => {
            "[Enter] dismiss  [q] quit"
        }
        Screen::StartGame {
            confirmed: Some(_),
            input,
            ..
        } if input.is_empty() => "[Enter] start game  [0-9] type  [r] reset  [q] quit",
        Screen::StartGame { .. } => "[0-9] type  [Backspace] delete  [Enter] confirm  [r] reset  [q] quit",
        Screen::Game { .. } => "[-] lower  [+] greater  [Esc] give up  [q] quit",
        Screen::GameOver { .. } => "[Enter] new game  [q] quit",
    };

    Paragraph::new(Span::styled(help_text, theme::STYLE_HELP))
}

/// A bordered box around a single number.
fn number_box(value: u32) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(value.to_string(), theme::STYLE_NUMBER)))
        .centered()
        .block(Block::default().borders(Borders::ALL).border_style(theme::STYLE_NUMBER))
}

/// Center a fixed-size rect inside `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

// ============================================================================
// SCREEN: START GAME
// ============================================================================

fn render_start_game(
    input: &str,
    confirmed: Option<u32>,
    bounds: &GuessBounds,
    frame: &mut Frame,
    area: Rect,
) {
    let chunks = Layout::vertical([
        Constraint::Length(2), // prompt
        Constraint::Length(3), // input field
        Constraint::Length(1), // spacer
        Constraint::Min(0),    // confirmation
    ])
    .split(area);

    let prompt = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Select a number "),
            Span::styled(
                format!("({}-{})", bounds.low, bounds.max_secret()),
                theme::STYLE_DIM,
            ),
        ]),
    ]);
    frame.render_widget(prompt, chunks[0]);

    let field_width = bounds.input_len() as u16 + 4;
    let field = Paragraph::new(Line::from(vec![
        Span::styled(input.to_string(), theme::STYLE_IMPORTANT),
        Span::styled("_", theme::STYLE_INTERACTIVE),
    ]))
    .centered()
    .block(Block::default().borders(Borders::ALL).border_style(theme::STYLE_INTERACTIVE));
    frame.render_widget(field, centered(chunks[1], field_width, 3));

    if let Some(number) = confirmed {
        let card = Layout::vertical([
            Constraint::Length(1), // label
            Constraint::Length(3), // number
            Constraint::Length(1), // button
        ])
        .split(chunks[3]);

        frame.render_widget(
            Paragraph::new(Span::raw("You selected:")).centered(),
            card[0],
        );
        frame.render_widget(number_box(number), centered(card[1], 8, 3));
        frame.render_widget(
            Paragraph::new(Span::styled("[Enter] START GAME!", theme::STYLE_SAFE)).centered(),
            card[2],
        );
    }
}

// ============================================================================
// SCREEN: GAME
// ============================================================================

fn render_game(guess: u32, rounds: u32, frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(2), // label
        Constraint::Length(3), // guess
        Constraint::Length(1), // spacer
        Constraint::Length(1), // buttons
        Constraint::Min(0),    // round counter
    ])
    .split(area);

    let label = Paragraph::new(vec![Line::from(""), Line::from("Opponent's guess:")]).centered();
    frame.render_widget(label, chunks[0]);

    frame.render_widget(number_box(guess), centered(chunks[1], 8, 3));

    let buttons = Paragraph::new(Line::from(vec![
        Span::styled("[ - ] lower", theme::STYLE_INTERACTIVE),
        Span::raw("        "),
        Span::styled("[ + ] greater", theme::STYLE_INTERACTIVE),
    ]))
    .centered();
    frame.render_widget(buttons, chunks[3]);

    let counter = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!("Hints: {}", rounds), theme::STYLE_DIM)),
    ])
    .centered();
    frame.render_widget(counter, chunks[4]);
}

// ============================================================================
// SCREEN: GAME OVER
// ============================================================================

fn render_game_over(rounds: u32, secret: u32, frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("The game is over!", theme::STYLE_SAFE)),
        Line::from(""),
        Line::from(vec![
            Span::raw("Your phone needed "),
            Span::styled(rounds.to_string(), theme::STYLE_NUMBER),
            Span::raw(format!(" round{} to guess the number ", if rounds == 1 { "" } else { "s" })),
            Span::styled(secret.to_string(), theme::STYLE_NUMBER),
            Span::raw("."),
        ]),
        Line::from(""),
        Line::from(Span::styled("[Enter] NEW GAME", theme::STYLE_INTERACTIVE)),
    ];

    let paragraph = Paragraph::new(lines).centered().wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// ALERT OVERLAY
// ============================================================================

fn render_alert(alert: &Alert, frame: &mut Frame, area: Rect) {
    let rect = centered(area, 44, 7);

    let lines = vec![
        Line::from(""),
        Line::from(alert.message().to_string()),
        Line::from(""),
        Line::from(Span::styled(
            format!("[Enter] {}", alert.dismiss_label()),
            theme::STYLE_INTERACTIVE,
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::STYLE_WARNING)
        .title(Span::styled(format!(" {} ", alert.title()), theme::STYLE_WARNING));

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).centered().wrap(Wrap { trim: true }).block(block),
        rect,
    );
}

// ============================================================================
// TESTS
// ============================================================================
