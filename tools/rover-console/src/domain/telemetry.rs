//! Robot telemetry and system information.

use chrono::{DateTime, Local};

use crate::api::{ApiRobotStatus, ApiSystemInfo, StatusReport};

/// Frame rate shown when the server does not report one.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Shown when no control port is configured.
pub const PORT_PLACEHOLDER: &str = "Not configured";

/// Planar robot position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Two decimals, as in the telemetry detail panel.
    pub fn detail_label(&self) -> String {
        format!("{}, {}", fixed(self.x, 2), fixed(self.y, 2))
    }

    /// One decimal, as in the map panel and log rows.
    pub fn compact_label(&self) -> String {
        format!("{}, {}", fixed(self.x, 1), fixed(self.y, 1))
    }
}

/// Fixed-point text with ties rounded away from zero (0.25 -> "0.3").
///
/// `format!("{:.1}")` rounds exact ties to even, which would show 0.25 as "0.2".
pub fn fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    format!("{:.*}", decimals, rounded)
}

impl From<[f64; 2]> for Position {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

/// Heading rounded to whole degrees, e.g. "91°".
/// Halves round up, so -45.5 reads "-45°".
pub fn heading_label(heading: f64) -> String {
    let floor = heading.floor();
    let whole = if heading - floor >= 0.5 { floor + 1.0 } else { floor };
    format!("{}°", whole as i64)
}

/// Latest status snapshot from the robot.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotStatus {
    pub position: Position,
    pub heading: f64,
    pub speed: f64,
    pub battery: f64,
    pub obstacles_detected: u32,
    pub connected: bool,
    pub movements_recorded: u32,
    /// Free-text robot state
    pub state_text: Option<String>,
    pub last_command: Option<String>,
}

impl From<ApiRobotStatus> for RobotStatus {
    fn from(status: ApiRobotStatus) -> Self {
        Self {
            position: status.position.into(),
            heading: status.heading,
            speed: status.speed,
            battery: status.battery,
            obstacles_detected: status.obstacles_detected,
            connected: status.connected,
            movements_recorded: status.movements_recorded,
            state_text: status.status,
            last_command: status.last_command,
        }
    }
}

impl RobotStatus {
    pub fn heading_label(&self) -> String {
        heading_label(self.heading)
    }

    pub fn speed_label(&self) -> String {
        if self.speed.fract() == 0.0 {
            format!("{}", self.speed as i64)
        } else {
            fixed(self.speed, 1)
        }
    }
}

/// Static robot/server configuration, fetched once.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemInfo {
    pub camera_resolution: (u32, u32),
    pub arduino_port: Option<String>,
    pub map_size: (u32, u32),
    pub frame_rate: f64,
}

impl From<ApiSystemInfo> for SystemInfo {
    fn from(info: ApiSystemInfo) -> Self {
        Self {
            camera_resolution: (info.camera_resolution[0], info.camera_resolution[1]),
            arduino_port: info.arduino_port.filter(|p| !p.trim().is_empty()),
            map_size: (info.map_size[0], info.map_size[1]),
            frame_rate: info.frame_rate.unwrap_or(DEFAULT_FRAME_RATE),
        }
    }
}

impl SystemInfo {
    pub fn resolution_label(&self) -> String {
        format!("{}x{}", self.camera_resolution.0, self.camera_resolution.1)
    }

    pub fn frame_rate_label(&self) -> String {
        format!("{} fps", self.frame_rate.round() as i64)
    }

    pub fn map_size_label(&self) -> String {
        format!("{}x{}", self.map_size.0, self.map_size.1)
    }

    pub fn port_label(&self) -> &str {
        self.arduino_port.as_deref().unwrap_or(PORT_PLACEHOLDER)
    }
}

/// Everything the telemetry panels show.
///
/// Failed polls never clear what is displayed.
#[derive(Debug, Clone, Default)]
pub struct TelemetryView {
    pub status: Option<RobotStatus>,
    pub system_info: Option<SystemInfo>,
    pub camera_available: Option<bool>,
    pub arduino_connected: Option<bool>,
    pub last_update: Option<DateTime<Local>>,
    /// Consecutive failed status polls, reset by the next success
    pub failed_polls: u32,
}

impl TelemetryView {
    /// Replace the displayed snapshot. Returns the new connection flag.
    pub fn apply_status(&mut self, report: StatusReport, at: DateTime<Local>) -> bool {
        let status = RobotStatus::from(report.status);
        let connected = status.connected;
        self.status = Some(status);
        if report.camera_available.is_some() {
            self.camera_available = report.camera_available;
        }
        if report.arduino_connected.is_some() {
            self.arduino_connected = report.arduino_connected;
        }
        self.last_update = Some(at);
        self.failed_polls = 0;
        connected
    }

    pub fn record_failure(&mut self) -> u32 {
        self.failed_polls = self.failed_polls.saturating_add(1);
        self.failed_polls
    }

    pub fn apply_system_info(&mut self, info: ApiSystemInfo) {
        self.system_info = Some(info.into());
    }
}
