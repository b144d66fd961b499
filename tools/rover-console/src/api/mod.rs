//! API client module for communicating with the robot server.
//!
//! Plain JSON over HTTP. Every endpoint answers with a `success` flag plus a
//! payload; `success: false` is surfaced as [`ApiError::Rejected`].

mod client;
mod types;

use async_trait::async_trait;

pub use client::{ApiError, RobotApiClient};
pub use types::*;

/// Outbound port to the robot server.
///
/// The session only talks to the robot through this trait so it can be
/// driven by an in-memory double in tests.
#[async_trait]
pub trait RobotApi: Send + Sync {
    /// GET /api/test_camera
    async fn test_camera(&self) -> Result<Outcome, ApiError>;

    /// POST /api/connect
    async fn connect(&self) -> Result<Outcome, ApiError>;

    /// POST /api/disconnect. The `success` flag is not inspected.
    async fn disconnect(&self) -> Result<Outcome, ApiError>;

    /// POST /api/command
    async fn send_command(&self, request: &CommandRequest) -> Result<Outcome, ApiError>;

    /// POST /api/navigate
    async fn navigate(&self, target: &str) -> Result<Outcome, ApiError>;

    /// POST /api/explore
    async fn explore(&self) -> Result<Outcome, ApiError>;

    /// POST /api/start_stream or /api/stop_stream. The reply is not inspected.
    async fn set_streaming(&self, active: bool) -> Result<Outcome, ApiError>;

    /// GET /api/snapshot
    async fn snapshot(&self) -> Result<SnapshotReport, ApiError>;

    /// GET /api/map
    async fn map(&self) -> Result<MapReport, ApiError>;

    /// GET /api/status
    async fn status(&self) -> Result<StatusReport, ApiError>;

    /// GET /api/system_info
    async fn system_info(&self) -> Result<SystemInfoReport, ApiError>;

    /// GET /api/movement_log
    async fn movement_log(&self) -> Result<MovementLogReport, ApiError>;

    /// POST /api/reset
    async fn reset(&self) -> Result<Outcome, ApiError>;
}
