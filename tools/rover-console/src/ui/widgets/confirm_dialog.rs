//! Yes/no confirmation dialog.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::domain::ConfirmAction;

use super::centered_fixed;

pub fn render_confirm_dialog(frame: &mut Frame, action: ConfirmAction) {
    let area = centered_fixed(48, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::raw(action.question()),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Yellow)),
            Span::raw(" Yes   "),
            Span::styled("[n]", Style::default().fg(Color::Yellow)),
            Span::raw(" No"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Confirm ")
                .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

    frame.render_widget(paragraph, area);
}
