//! Right panel: camera, map and movement log.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::domain::{yes_no, App, EntryStatus, ObstacleAnalysis, EMPTY_PLACEHOLDER};

use super::{flag_color, panel};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Camera
            Constraint::Length(6), // Map
            Constraint::Min(8),    // Movement log
        ])
        .split(area);

    render_camera(frame, chunks[0], app);
    render_map(frame, chunks[1], app);
    render_movement_log(frame, chunks[2], app);
}

/// Camera panel. Also used alone when fullscreen.
pub fn render_camera(frame: &mut Frame, area: Rect, app: &App) {
    let camera = &app.camera;

    let stream_style = if camera.is_streaming() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if camera.fullscreen {
        "CAMERA (fullscreen, [f] to restore)"
    } else {
        "CAMERA"
    };
    let block = panel(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [status_area, table_area] = Layout::horizontal([Constraint::Min(30), Constraint::Length(24)])
        .areas(inner);

    let camera_state = match camera.camera_ok {
        Some(true) => Span::styled("OK", Style::default().fg(Color::Green)),
        Some(false) => Span::styled("Unavailable", Style::default().fg(Color::Red)),
        None => Span::styled("Testing...", Style::default().fg(Color::DarkGray)),
    };

    let mut lines = vec![
        Line::from(vec![Span::raw("Camera: "), camera_state]),
        Line::from(vec![
            Span::raw("Stream: "),
            Span::styled(camera.stream_label(), stream_style),
            Span::styled("  [v]", Style::default().fg(Color::Yellow)),
        ]),
    ];

    match &camera.last_snapshot {
        Some(snapshot) => {
            lines.push(Line::from(vec![
                Span::raw("Snapshot: "),
                Span::raw(snapshot.taken_at.format("%H:%M:%S").to_string()),
                Span::styled(
                    format!(" ({} bytes)", snapshot.image_bytes),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            lines.push(Line::styled(
                snapshot.image_path.display().to_string(),
                Style::default().fg(Color::DarkGray),
            ));
            lines.push(Line::styled(
                snapshot.analysis.advice(),
                Style::default().fg(if snapshot.analysis.any() {
                    Color::Yellow
                } else {
                    Color::Green
                }),
            ));
        }
        None => lines.push(Line::from(vec![
            Span::styled("No snapshot yet ", Style::default().fg(Color::DarkGray)),
            Span::styled("[p]", Style::default().fg(Color::Yellow)),
        ])),
    }

    frame.render_widget(Paragraph::new(lines), status_area);

    if let Some(snapshot) = &camera.last_snapshot {
        frame.render_widget(obstacle_table(&snapshot.analysis), table_area);
    }
}

/// Left/Center/Right table with coloured Yes/No cells.
pub(crate) fn obstacle_table(analysis: &ObstacleAnalysis) -> Table<'static> {
    let rows = analysis.rows().into_iter().map(|(sector, blocked)| {
        Row::new(vec![
            Cell::from(sector),
            Cell::from(Span::styled(
                yes_no(blocked),
                Style::default().fg(flag_color(blocked)).add_modifier(Modifier::BOLD),
            )),
        ])
    });

    Table::new(rows, [Constraint::Length(8), Constraint::Length(4)]).header(
        Row::new(vec!["Sector", "Obstacle"]).style(Style::default().fg(Color::DarkGray)),
    )
}

fn render_map(frame: &mut Frame, area: Rect, app: &App) {
    let map = &app.map;

    let image = match &map.image_path {
        Some(path) => Span::raw(format!("{} ({} bytes)", path.display(), map.image_bytes)),
        None => Span::styled("Not loaded", Style::default().fg(Color::DarkGray)),
    };
    let updated = map
        .updated_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--".to_string());

    let lines = vec![
        Line::from(vec![
            Span::raw("Position: "),
            Span::styled(map.position_label(), Style::default().fg(Color::Cyan)),
            Span::raw("   Heading: "),
            Span::styled(map.heading_label(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![Span::raw("Image: "), image]),
        Line::from(vec![
            Span::styled(format!("Updated {}", updated), Style::default().fg(Color::DarkGray)),
            Span::styled("  [m]", Style::default().fg(Color::Yellow)),
            Span::raw(" Refresh"),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(panel("MAP")), area);
}

fn render_movement_log(frame: &mut Frame, area: Rect, app: &App) {
    let log = &app.movement_log;

    let title = match log.total_recorded() {
        Some(total) => format!("MOVEMENT LOG ({} total)", total),
        None => "MOVEMENT LOG".to_string(),
    };

    if log.is_placeholder() {
        let placeholder = Paragraph::new(Line::styled(
            EMPTY_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
        .block(panel(title));
        frame.render_widget(placeholder, area);
        return;
    }

    let rows: Vec<Row> = log
        .entries()
        .map(|entry| {
            let glyph_color = match entry.status {
                EntryStatus::Executed => Color::Green,
                EntryStatus::Failed => Color::Red,
            };
            // Provisional rows are dimmed until the next fetch confirms them.
            let row_style = if entry.is_provisional() {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };
            let marker = if entry.is_provisional() { "~" } else { " " };

            Row::new(vec![
                Cell::from(entry.time_label()),
                Cell::from(format!("{}{}", marker, crate::domain::command_label(&entry.command))),
                Cell::from(entry.position_label()),
                Cell::from(entry.heading_label()),
                Cell::from(Span::styled(
                    entry.status.glyph().to_string(),
                    Style::default().fg(glyph_color),
                )),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Min(14),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(2),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Time", " Command", "Position", "Head", ""])
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)),
        )
        .block(panel(title));

    frame.render_widget(table, area);
}
