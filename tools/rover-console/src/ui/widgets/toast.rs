//! Notification toast, pinned to the top-right corner.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Notification, NotificationCenter};
use crate::ui::severity_color;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 5;

pub fn render_toast(frame: &mut Frame, notification: &Notification, center: &NotificationCenter) {
    let screen = frame.area();
    let width = TOAST_WIDTH.min(screen.width);
    let height = TOAST_HEIGHT.min(screen.height);
    let area = Rect {
        x: screen.x + screen.width.saturating_sub(width + 1),
        y: screen.y + 1u16.min(screen.height.saturating_sub(height)),
        width,
        height,
    };

    let color = severity_color(notification.severity);
    let remaining = center.remaining_fraction(Instant::now());
    let bar_width = width.saturating_sub(2) as usize;
    let filled = ((remaining * bar_width as f64).round() as usize).min(bar_width);

    let lines = vec![
        Line::raw(notification.message.as_str()),
        Line::styled("▬".repeat(filled), Style::default().fg(color)),
    ];

    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(
                format!(" {} {} ", notification.severity.icon(), notification.severity.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]))
        .title_bottom(Line::from(Span::styled(" [z] close ", Style::default().fg(Color::DarkGray))).right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
