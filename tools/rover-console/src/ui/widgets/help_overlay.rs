//! Help overlay widget.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

const MOVEMENT_KEYS: &[(&str, &str)] = &[
    ("  w / ↑  ", "Forward"),
    ("  s / ↓  ", "Backward"),
    ("  a / ←  ", "Turn left"),
    ("  d / →  ", "Turn right"),
    ("  q / e  ", "Smooth left / right"),
    ("  space  ", "Stop"),
    ("  + / -  ", "Change base speed"),
];

const ROBOT_KEYS: &[(&str, &str)] = &[
    ("  c      ", "Connect robot"),
    ("  Esc    ", "Disconnect robot"),
    ("  n      ", "Navigate to a target"),
    ("  x      ", "Start exploration"),
    ("  r      ", "Reset system (asks first)"),
];

const VIEW_KEYS: &[(&str, &str)] = &[
    ("  p      ", "Take snapshot"),
    ("  v      ", "Toggle camera stream"),
    ("  t      ", "Test camera"),
    ("  f      ", "Fullscreen camera panel"),
    ("  m      ", "Refresh map"),
    ("  l      ", "Clear movement log (asks first)"),
    ("  z      ", "Dismiss notification"),
    ("  ?      ", "Toggle this help"),
    ("  Ctrl-C ", "Quit"),
];

fn section(title: &'static str, keys: &[(&'static str, &'static str)]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    lines.extend(keys.iter().map(|(key, text)| {
        Line::from(vec![
            Span::styled(*key, Style::default().fg(Color::Yellow)),
            Span::raw(*text),
        ])
    }));
    lines.push(Line::raw(""));
    lines
}

/// Render a centered help overlay.
pub fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(60, 80, frame.area());

    frame.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled(
            "ROVER CONSOLE HELP",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    help_text.extend(section("Driving", MOVEMENT_KEYS));
    help_text.extend(section("Robot", ROBOT_KEYS));
    help_text.extend(section("Camera & View", VIEW_KEYS));
    help_text.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .title(" Help ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(paragraph, popup_area);
}
