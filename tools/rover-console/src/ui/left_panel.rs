//! Left panel: telemetry, battery, system info and the control pad.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::domain::{App, BatteryGauge, MoveCommand};

use super::{band_color, panel};

const BATTERY_BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // Telemetry
            Constraint::Length(3),  // Battery
            Constraint::Length(6),  // System info
            Constraint::Min(8),     // Controls
        ])
        .split(area);

    render_telemetry(frame, chunks[0], app);
    render_battery(frame, chunks[1], app);
    render_system_info(frame, chunks[2], app);
    render_controls(frame, chunks[3], app);
}

fn field(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<11}", label), Style::default().fg(Color::DarkGray)),
        Span::raw(value.into()),
    ])
}

fn indicator(label: &str, flag: Option<bool>) -> Span<'static> {
    let (glyph, color) = match flag {
        Some(true) => ("●", Color::Green),
        Some(false) => ("●", Color::Red),
        None => ("○", Color::DarkGray),
    };
    Span::styled(format!("{} {}  ", glyph, label), Style::default().fg(color))
}

fn render_telemetry(frame: &mut Frame, area: Rect, app: &App) {
    let telemetry = &app.telemetry;

    let mut lines = match &telemetry.status {
        Some(status) => vec![
            field("Position", status.position.detail_label()),
            field("Heading", status.heading_label()),
            field("Speed", status.speed_label()),
            field("Obstacles", status.obstacles_detected.to_string()),
            field("Movements", status.movements_recorded.to_string()),
            field("State", status.state_text.clone().unwrap_or_else(|| "-".to_string())),
            field(
                "Last cmd",
                status
                    .last_command
                    .as_deref()
                    .map(crate::domain::command_label)
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ],
        None => vec![Line::styled(
            "Waiting for telemetry...",
            Style::default().fg(Color::DarkGray),
        )],
    };

    lines.push(Line::from(vec![
        indicator("Camera", telemetry.camera_available),
        indicator("Arduino", telemetry.arduino_connected),
    ]));

    if telemetry.failed_polls > 0 {
        lines.push(Line::styled(
            format!("⚠ {} missed poll(s)", telemetry.failed_polls),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(lines).block(panel("TELEMETRY")), area);
}

fn render_battery(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.telemetry.status {
        Some(status) => {
            let gauge = BatteryGauge::new(status.battery);
            let color = band_color(gauge.band());
            Line::from(vec![
                Span::styled(gauge.bar(BATTERY_BAR_WIDTH), Style::default().fg(color)),
                Span::styled(
                    format!(" {:>4}", gauge.label()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ])
        }
        None => Line::styled("--", Style::default().fg(Color::DarkGray)),
    };

    frame.render_widget(Paragraph::new(line).block(panel("BATTERY")), area);
}

fn render_system_info(frame: &mut Frame, area: Rect, app: &App) {
    let lines = match &app.telemetry.system_info {
        Some(info) => vec![
            field("Camera", info.resolution_label()),
            field("Frame rate", info.frame_rate_label()),
            field("Map size", info.map_size_label()),
            field("Port", info.port_label()),
        ],
        None => vec![Line::styled("Loading...", Style::default().fg(Color::DarkGray))],
    };

    frame.render_widget(Paragraph::new(lines).block(panel("SYSTEM INFO")), area);
}

fn pad_button(app: &App, command: MoveCommand, glyph: &str) -> Span<'static> {
    let text = format!(" {:<5} {} ", command.hint(), glyph);
    let style = if app.is_pulsing(command) {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if app.connection.is_connected() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(text, style)
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let blank = || Span::raw(" ".repeat(9));

    let lines = vec![
        Line::from(vec![
            pad_button(app, MoveCommand::SmoothLeft, "↖"),
            pad_button(app, MoveCommand::Forward, "▲"),
            pad_button(app, MoveCommand::SmoothRight, "↗"),
        ]),
        Line::from(vec![
            pad_button(app, MoveCommand::Left, "◀"),
            pad_button(app, MoveCommand::Stop, "■"),
            pad_button(app, MoveCommand::Right, "▶"),
        ]),
        Line::from(vec![
            blank(),
            pad_button(app, MoveCommand::Backward, "▼"),
            blank(),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Last: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                app.last_command.clone().unwrap_or_else(|| "-".to_string()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Speed: ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.speed.to_string()),
            Span::styled("  [+/-]", Style::default().fg(Color::Yellow)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(panel("CONTROLS")), area);
}
