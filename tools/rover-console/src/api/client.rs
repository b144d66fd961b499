//! HTTP client for the robot server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::types::*;
use super::RobotApi;

/// Errors that can occur when communicating with the robot server.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Unexpected HTTP status {status} from {path}")]
    Status { status: u16, path: String },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    /// The server answered with `success: false`.
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Whether the server answered at all (as opposed to a transport failure).
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected(_))
    }
}

/// Robot server client.
pub struct RobotApiClient {
    client: Client,
    base_url: String,
}

impl RobotApiClient {
    /// Create a new client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(ApiError::Http)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Server base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        Self::read(path, response).await
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, ApiError> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        Self::read(path, response).await
    }

    async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.post::<(), R>(path, None).await
    }

    async fn read<R: DeserializeOwned>(path: &str, response: Response) -> Result<R, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(format!("Cannot connect to {}", self.base_url))
        } else {
            ApiError::Http(e)
        }
    }
}

/// Turn `success: false` into [`ApiError::Rejected`].
fn accept(outcome: &Outcome) -> Result<(), ApiError> {
    if outcome.success {
        Ok(())
    } else {
        Err(ApiError::Rejected(outcome.reason()))
    }
}

fn missing(field: &str) -> ApiError {
    ApiError::Parse(format!("Missing `{}` in response", field))
}

#[async_trait]
impl RobotApi for RobotApiClient {
    async fn test_camera(&self) -> Result<Outcome, ApiError> {
        let outcome: Outcome = self.get("/api/test_camera").await?;
        accept(&outcome)?;
        Ok(outcome)
    }

    async fn connect(&self) -> Result<Outcome, ApiError> {
        let outcome: Outcome = self.post_empty("/api/connect").await?;
        accept(&outcome)?;
        Ok(outcome)
    }

    async fn disconnect(&self) -> Result<Outcome, ApiError> {
        self.post_empty("/api/disconnect").await
    }

    async fn send_command(&self, request: &CommandRequest) -> Result<Outcome, ApiError> {
        let outcome: Outcome = self.post("/api/command", Some(request)).await?;
        accept(&outcome)?;
        Ok(outcome)
    }

    async fn navigate(&self, target: &str) -> Result<Outcome, ApiError> {
        let outcome: Outcome = self
            .post("/api/navigate", Some(&NavigateRequest { target }))
            .await?;
        accept(&outcome)?;
        Ok(outcome)
    }

    async fn explore(&self) -> Result<Outcome, ApiError> {
        let outcome: Outcome = self.post_empty("/api/explore").await?;
        accept(&outcome)?;
        Ok(outcome)
    }

    async fn set_streaming(&self, active: bool) -> Result<Outcome, ApiError> {
        let path = if active {
            "/api/start_stream"
        } else {
            "/api/stop_stream"
        };
        self.post_empty(path).await
    }

    async fn snapshot(&self) -> Result<SnapshotReport, ApiError> {
        let envelope: SnapshotEnvelope = self.get("/api/snapshot").await?;
        accept(&envelope.outcome)?;

        Ok(SnapshotReport {
            image: envelope.image.ok_or_else(|| missing("image"))?,
            analysis: envelope.analysis,
            camera_available: envelope.camera_available,
        })
    }

    async fn map(&self) -> Result<MapReport, ApiError> {
        let envelope: MapEnvelope = self.get("/api/map").await?;
        accept(&envelope.outcome)?;

        Ok(MapReport {
            map: envelope.map.ok_or_else(|| missing("map"))?,
            position: envelope.position,
            heading: envelope.heading,
        })
    }

    async fn status(&self) -> Result<StatusReport, ApiError> {
        let envelope: StatusEnvelope = self.get("/api/status").await?;
        accept(&envelope.outcome)?;

        Ok(StatusReport {
            status: envelope.status.ok_or_else(|| missing("status"))?,
            camera_available: envelope.camera_available,
            arduino_connected: envelope.arduino_connected,
        })
    }

    async fn system_info(&self) -> Result<SystemInfoReport, ApiError> {
        let envelope: SystemInfoEnvelope = self.get("/api/system_info").await?;
        accept(&envelope.outcome)?;

        envelope.info.ok_or_else(|| missing("info"))
    }

    async fn movement_log(&self) -> Result<MovementLogReport, ApiError> {
        let envelope: MovementLogEnvelope = self.get("/api/movement_log").await?;
        accept(&envelope.outcome)?;

        Ok(MovementLogReport {
            movements: envelope.movements.unwrap_or_default(),
            total_movements: envelope.total_movements,
        })
    }

    async fn reset(&self) -> Result<Outcome, ApiError> {
        let outcome: Outcome = self.post_empty("/api/reset").await?;
        accept(&outcome)?;
        Ok(outcome)
    }
}
