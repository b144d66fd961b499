//! UI module - TUI rendering components.
//!
//! - `layout.rs`: header, body split, footer and overlays
//! - `left_panel.rs`: telemetry, battery, system info, control pad
//! - `right_panel.rs`: camera, map and movement log
//! - `widgets/`: overlays drawn on top of the dashboard

mod layout;
mod left_panel;
mod right_panel;

pub mod widgets;

pub use layout::render;

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::domain::{BatteryBand, Severity};

/// Bordered panel with the standard cyan title.
pub(crate) fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

pub(crate) fn band_color(band: BatteryBand) -> Color {
    match band {
        BatteryBand::Green => Color::Green,
        BatteryBand::Amber => Color::Yellow,
        BatteryBand::Red => Color::Red,
    }
}

pub(crate) fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Cyan,
    }
}

pub(crate) fn flag_color(flag: bool) -> Color {
    if flag {
        Color::Red
    } else {
        Color::Green
    }
}
