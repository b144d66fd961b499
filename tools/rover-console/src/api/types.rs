//! Wire types for the robot server's JSON API.

use serde::{Deserialize, Serialize};

/// The `success`/`message`/`error` triple every reply carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Outcome {
    /// A successful outcome carrying a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Server-supplied explanation: `message`, then `error`.
    pub fn reason(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }

    /// The server message, or `fallback` when none was sent.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Body of POST /api/command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRequest {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u8>,
}

impl CommandRequest {
    /// A timed movement command. Zero or NaN durations are left out of the body.
    pub fn movement(command: impl Into<String>, duration: f64) -> Self {
        let duration = (duration != 0.0 && !duration.is_nan()).then_some(duration);
        Self {
            command: command.into(),
            duration,
            speed: None,
        }
    }

    /// The `set_speed` command.
    pub fn set_speed(speed: u8) -> Self {
        Self {
            command: "set_speed".to_string(),
            duration: None,
            speed: Some(speed),
        }
    }
}

/// Body of POST /api/navigate.
#[derive(Debug, Clone, Serialize)]
pub struct NavigateRequest<'a> {
    pub target: &'a str,
}

/// Robot status as reported by /api/status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiRobotStatus {
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(default)]
    pub heading: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub battery: f64,
    #[serde(default)]
    pub obstacles_detected: u32,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub movements_recorded: u32,
    /// Free-text robot state, e.g. "Simulated Mode"
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_command: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub status: Option<ApiRobotStatus>,
    #[serde(default)]
    pub camera_available: Option<bool>,
    #[serde(default)]
    pub arduino_connected: Option<bool>,
}

/// Successful /api/status reply.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: ApiRobotStatus,
    pub camera_available: Option<bool>,
    pub arduino_connected: Option<bool>,
}

/// System information from /api/system_info.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSystemInfo {
    #[serde(default)]
    pub camera_resolution: [u32; 2],
    #[serde(default)]
    pub arduino_port: Option<String>,
    #[serde(default)]
    pub map_size: [u32; 2],
    #[serde(default)]
    pub frame_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SystemInfoEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub info: Option<ApiSystemInfo>,
}

/// Successful /api/system_info reply.
pub type SystemInfoReport = ApiSystemInfo;

/// One recorded movement from /api/movement_log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMovement {
    pub timestamp: String,
    pub command: String,
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(default)]
    pub heading: f64,
    /// "executed" or "failed"; the server omits it for plain recordings
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MovementLogEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub movements: Option<Vec<ApiMovement>>,
    #[serde(default)]
    pub total_movements: Option<u64>,
}

/// Successful /api/movement_log reply, oldest movement first.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementLogReport {
    pub movements: Vec<ApiMovement>,
    pub total_movements: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MapEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub position: [f64; 2],
    #[serde(default)]
    pub heading: f64,
}

/// Successful /api/map reply.
#[derive(Debug, Clone, PartialEq)]
pub struct MapReport {
    /// Base64 PNG
    pub map: String,
    pub position: [f64; 2],
    pub heading: f64,
}

/// Obstacle flags computed server-side for a camera frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiObstacleAnalysis {
    #[serde(default)]
    pub left_obstacle: bool,
    #[serde(default)]
    pub center_obstacle: bool,
    #[serde(default)]
    pub right_obstacle: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnapshotEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub analysis: ApiObstacleAnalysis,
    #[serde(default)]
    pub camera_available: Option<bool>,
}

/// Successful /api/snapshot reply.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotReport {
    /// Base64 JPEG
    pub image: String,
    pub analysis: ApiObstacleAnalysis,
    pub camera_available: Option<bool>,
}
