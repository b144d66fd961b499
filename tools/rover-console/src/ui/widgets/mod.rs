//! Overlays drawn on top of the dashboard.

mod confirm_dialog;
mod help_overlay;
mod snapshot_dialog;
mod toast;

pub use confirm_dialog::render_confirm_dialog;
pub use help_overlay::render_help_overlay;
pub use snapshot_dialog::render_snapshot_dialog;
pub use toast::render_toast;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Create a centered rectangle.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// A fixed-size rectangle centered in `area`, shrunk to fit.
pub(crate) fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width.min(area.width))]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
