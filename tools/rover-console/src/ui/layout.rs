//! Main layout orchestration.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ROVER CONSOLE v0.1.0  ● Connected        [c] Connect  [?]Help  │
//! ├────────────────────────┬────────────────────────────────────────┤
//! │  TELEMETRY             │  CAMERA                                │
//! │  BATTERY               ├────────────────────────────────────────┤
//! │  SYSTEM INFO           │  MAP                                   │
//! │  CONTROLS              ├────────────────────────────────────────┤
//! │                        │  MOVEMENT LOG                          │
//! └────────────────────────┴────────────────────────────────────────┘
//! │  [wasd] Move  [space] Stop  [n] Navigate  [p] Snapshot  ...     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{App, AppState};

use super::{left_panel, right_panel, widgets};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Body
            Constraint::Length(3), // Footer (keybinds or prompt)
        ])
        .split(size);

    render_header(frame, main_chunks[0], app);
    render_body(frame, main_chunks[1], app);
    if app.state == AppState::NavigateInput {
        render_prompt(frame, main_chunks[2], app);
    } else {
        render_footer(frame, main_chunks[2]);
    }

    match app.state {
        AppState::Help => widgets::render_help_overlay(frame),
        AppState::Snapshot => {
            if let Some(snapshot) = &app.camera.last_snapshot {
                widgets::render_snapshot_dialog(frame, snapshot);
            }
        }
        AppState::Confirm(action) => widgets::render_confirm_dialog(frame, action),
        _ => {}
    }

    if let Some(notification) = app.notifications.current() {
        widgets::render_toast(frame, notification, &app.notifications);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let connection = &app.connection;

    let mut indicator_style = Style::default().fg(if connection.is_connected() {
        Color::Green
    } else {
        Color::Red
    });
    if connection.pulsing() {
        indicator_style = indicator_style.add_modifier(Modifier::SLOW_BLINK);
    }

    let title = vec![
        Span::styled(
            " ROVER CONSOLE ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("v0.1.0 ", Style::default().fg(Color::DarkGray)),
        Span::styled("● ", indicator_style),
        Span::raw(connection.status_text()),
    ];

    let updated = match app.telemetry.last_update {
        Some(time) => Span::styled(
            format!("  Updated {} ", time.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        None => Span::styled("  No data ", Style::default().fg(Color::DarkGray)),
    };

    let connect_style = if connection.connect_enabled() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let hints = vec![
        Span::styled("[c] ", connect_style),
        Span::styled(
            format!("{} ", connection.connect_label()),
            if connection.connect_enabled() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            },
        ),
        Span::styled("[?]", Style::default().fg(Color::Yellow)),
        Span::raw("Help "),
        Span::styled("[^C]", Style::default().fg(Color::Yellow)),
        Span::raw("Quit "),
    ];

    let title_len: usize = title.iter().map(|s| s.content.chars().count()).sum();
    let updated_len = updated.content.chars().count();
    let hints_len: usize = hints.iter().map(|s| s.content.chars().count()).sum();
    // Two border cells.
    let padding = area
        .width
        .saturating_sub((title_len + updated_len + hints_len + 2) as u16);

    let mut spans = title;
    spans.push(updated);
    spans.push(Span::raw(" ".repeat(padding as usize)));
    spans.extend(hints);

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(header, area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    if app.camera.fullscreen {
        right_panel::render_camera(frame, area, app);
        return;
    }

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(34), // Telemetry + controls
            Constraint::Min(40),    // Camera, map, log
        ])
        .split(area);

    left_panel::render(frame, body_chunks[0], app);
    right_panel::render(frame, body_chunks[1], app);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let keys = [
        ("[wasd/↑↓←→]", " Move  "),
        ("[q/e]", " Smooth  "),
        ("[space]", " Stop  "),
        ("[n]", " Navigate  "),
        ("[x]", " Explore  "),
        ("[p]", " Snapshot  "),
        ("[v]", " Stream  "),
        ("[f]", " Fullscreen  "),
        ("[Esc]", " Disconnect  "),
    ];
    let keybinds: Vec<Span> = keys
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(*key, Style::default().fg(Color::Yellow)),
                Span::raw(*label),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(keybinds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .centered();

    frame.render_widget(footer, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            "Navigate to: ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(app.navigate_input.as_str()),
        Span::styled("█", Style::default().fg(Color::Yellow)),
        Span::raw("   "),
        Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
        Span::raw(" Go  "),
        Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
        Span::raw(" Cancel"),
    ]);

    let prompt = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(prompt, area);
}
