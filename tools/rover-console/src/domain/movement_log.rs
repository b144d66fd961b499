//! Bounded, newest-first view over the robot's movement history.
//!
//! Rows come from two places: provisional rows appended the moment a command
//! is accepted, and confirmed rows from the server's movement log. A fetch
//! replaces the whole view; provisional rows are never merged.

use std::collections::VecDeque;

use chrono::{DateTime, Local, NaiveDateTime};

use super::telemetry::{heading_label, Position};
use crate::api::ApiMovement;

/// Maximum rows shown.
pub const MAX_VISIBLE_ENTRIES: usize = 10;

/// Text of the empty-state row.
pub const EMPTY_PLACEHOLDER: &str = "No movements recorded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Executed,
    Failed,
}

impl EntryStatus {
    /// Anything other than "failed" counts as executed.
    pub fn from_wire(status: Option<&str>) -> Self {
        match status {
            Some(s) if s.eq_ignore_ascii_case("failed") => EntryStatus::Failed,
            _ => EntryStatus::Executed,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            EntryStatus::Executed => '✓',
            EntryStatus::Failed => '✗',
        }
    }
}

/// Where a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Inserted locally before the server confirmed it
    Provisional,
    /// Part of the last authoritative fetch
    Confirmed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovementLogEntry {
    /// Local wall-clock time, `None` when the server's timestamp is unreadable
    pub timestamp: Option<NaiveDateTime>,
    pub command: String,
    pub position: Position,
    pub heading: f64,
    pub status: EntryStatus,
    pub provenance: Provenance,
}

impl MovementLogEntry {
    /// Row for a command the server just accepted. The real pose is not
    /// known yet, so position and heading are zero.
    pub fn provisional(command: impl Into<String>, at: DateTime<Local>) -> Self {
        Self {
            timestamp: Some(at.naive_local()),
            command: command.into(),
            position: Position::default(),
            heading: 0.0,
            status: EntryStatus::Executed,
            provenance: Provenance::Provisional,
        }
    }

    pub fn time_label(&self) -> String {
        self.timestamp
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string())
    }

    pub fn position_label(&self) -> String {
        self.position.compact_label()
    }

    pub fn heading_label(&self) -> String {
        heading_label(self.heading)
    }

    pub fn is_provisional(&self) -> bool {
        self.provenance == Provenance::Provisional
    }
}

impl From<ApiMovement> for MovementLogEntry {
    fn from(movement: ApiMovement) -> Self {
        Self {
            timestamp: parse_timestamp(&movement.timestamp),
            command: movement.command,
            position: movement.position.into(),
            heading: movement.heading,
            status: EntryStatus::from_wire(movement.status.as_deref()),
            provenance: Provenance::Confirmed,
        }
    }
}

/// Accepts RFC 3339 (converted to local time) or naive ISO-8601.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

#[derive(Debug, Clone)]
pub struct MovementLog {
    rows: VecDeque<MovementLogEntry>,
    placeholder: bool,
    total_recorded: Option<u64>,
}

impl Default for MovementLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementLog {
    /// Starts in the empty state.
    pub fn new() -> Self {
        Self {
            rows: VecDeque::with_capacity(MAX_VISIBLE_ENTRIES + 1),
            placeholder: true,
            total_recorded: None,
        }
    }

    /// Replace the view with the newest entries of an oldest-first list.
    ///
    /// An empty list leaves the view untouched. Returns whether it changed.
    pub fn replace_with_authoritative(
        &mut self,
        movements: Vec<ApiMovement>,
        total_recorded: Option<u64>,
    ) -> bool {
        if movements.is_empty() {
            return false;
        }

        let skip = movements.len().saturating_sub(MAX_VISIBLE_ENTRIES);
        self.rows = movements
            .into_iter()
            .skip(skip)
            .rev()
            .map(MovementLogEntry::from)
            .collect();
        self.placeholder = false;
        self.total_recorded = total_recorded;
        true
    }

    /// Insert at the top, trimming the oldest row past the cap.
    pub fn append_optimistic(&mut self, entry: MovementLogEntry) {
        if self.placeholder {
            self.rows.clear();
            self.placeholder = false;
        }
        self.rows.push_front(entry);
        while self.rows.len() > MAX_VISIBLE_ENTRIES {
            self.rows.pop_back();
        }
    }

    /// Show only the empty-state row. Confirmation happens upstream.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.placeholder = true;
        self.total_recorded = None;
    }

    pub fn entries(&self) -> impl Iterator<Item = &MovementLogEntry> {
        self.rows.iter()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Rows on screen, counting the placeholder as one.
    pub fn visible_rows(&self) -> usize {
        if self.placeholder {
            1
        } else {
            self.rows.len()
        }
    }

    pub fn total_recorded(&self) -> Option<u64> {
        self.total_recorded
    }
}
