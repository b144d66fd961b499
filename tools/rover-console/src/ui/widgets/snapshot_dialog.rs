//! Snapshot result dialog.

use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::domain::Snapshot;
use crate::ui::right_panel::obstacle_table;

use super::centered_fixed;

pub fn render_snapshot_dialog(frame: &mut Frame, snapshot: &Snapshot) {
    let area = centered_fixed(60, 14, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Camera Snapshot ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [info_area, table_area, advice_area, hint_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Min(2),
        Constraint::Length(1),
    ])
    .areas(inner);

    let info = vec![
        Line::from(vec![
            Span::styled("Taken:  ", Style::default().fg(Color::DarkGray)),
            Span::raw(snapshot.taken_at.format("%H:%M:%S").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Saved:  ", Style::default().fg(Color::DarkGray)),
            Span::raw(snapshot.image_path.display().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Size:   ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{} bytes", snapshot.image_bytes)),
        ]),
    ];
    frame.render_widget(Paragraph::new(info), info_area);

    frame.render_widget(obstacle_table(&snapshot.analysis), table_area);

    let advice_color = if snapshot.analysis.center {
        Color::Red
    } else if snapshot.analysis.any() {
        Color::Yellow
    } else {
        Color::Green
    };
    frame.render_widget(
        Paragraph::new(Line::styled(
            snapshot.analysis.advice(),
            Style::default().fg(advice_color).add_modifier(Modifier::BOLD),
        ))
        .wrap(Wrap { trim: true }),
        advice_area,
    );

    frame.render_widget(
        Paragraph::new(Line::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
        hint_area,
    );
}
