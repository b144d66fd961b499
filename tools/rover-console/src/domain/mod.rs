//! Domain models for the rover console.

mod app;
mod battery;
mod connection;
mod inflight;
mod keymap;
mod movement_log;
mod notification;
mod panels;
mod telemetry;

pub use app::{App, AppState, ConfirmAction, Pulse, DEFAULT_SPEED, MAX_TARGET_LEN, PULSE_DURATION, SPEED_STEP};
pub use battery::{BatteryBand, BatteryGauge};
pub use connection::ConnectionView;
pub use inflight::{Endpoint, InFlightTracker, Ticket};
pub use keymap::{command_label, resolve, Action, Focus, Key, MoveCommand};
pub use movement_log::{
    parse_timestamp, EntryStatus, MovementLog, MovementLogEntry, Provenance, EMPTY_PLACEHOLDER,
    MAX_VISIBLE_ENTRIES,
};
pub use notification::{Notification, NotificationCenter, Severity, NOTIFICATION_TTL};
pub use panels::{yes_no, CameraPanel, MapView, ObstacleAnalysis, Snapshot};
pub use telemetry::{
    heading_label, Position, RobotStatus, SystemInfo, TelemetryView, DEFAULT_FRAME_RATE,
    PORT_PLACEHOLDER,
};
