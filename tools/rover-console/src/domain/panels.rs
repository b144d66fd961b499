//! Camera and map panel state.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use super::telemetry::{heading_label, Position};
use crate::api::{ApiObstacleAnalysis, MapReport};

/// Obstacle flags for the three forward sectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObstacleAnalysis {
    pub left: bool,
    pub center: bool,
    pub right: bool,
}

impl From<ApiObstacleAnalysis> for ObstacleAnalysis {
    fn from(analysis: ApiObstacleAnalysis) -> Self {
        Self {
            left: analysis.left_obstacle,
            center: analysis.center_obstacle,
            right: analysis.right_obstacle,
        }
    }
}

impl ObstacleAnalysis {
    /// One-line driving advice. A blocked center always wins.
    pub fn advice(&self) -> &'static str {
        match (self.left, self.center, self.right) {
            (_, true, _) => "Obstacle ahead! Turn left or right to avoid.",
            (true, false, true) => "Obstacles on both sides. Proceed forward carefully.",
            (true, false, false) => "Obstacle on left. Safe to turn right.",
            (false, false, true) => "Obstacle on right. Safe to turn left.",
            (false, false, false) => "Path is clear. Safe to move forward.",
        }
    }

    /// Rows of the Left/Center/Right table.
    pub fn rows(&self) -> [(&'static str, bool); 3] {
        [
            ("Left", self.left),
            ("Center", self.center),
            ("Right", self.right),
        ]
    }

    pub fn any(&self) -> bool {
        self.left || self.center || self.right
    }
}

/// "Yes" / "No" cell text.
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// A captured camera frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub analysis: ObstacleAnalysis,
    /// Where the decoded JPEG was written
    pub image_path: PathBuf,
    pub image_bytes: usize,
    pub taken_at: DateTime<Local>,
}

#[derive(Debug, Clone, Default)]
pub struct CameraPanel {
    streaming: bool,
    /// Result of the last camera test, `None` before the first one returns
    pub camera_ok: Option<bool>,
    pub fullscreen: bool,
    pub last_snapshot: Option<Snapshot>,
}

impl CameraPanel {
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Seed from a camera test result.
    pub fn seed_from_camera_test(&mut self, ok: bool) {
        self.camera_ok = Some(ok);
        self.streaming = ok;
    }

    /// Flip the stream flag. Returns the new value.
    pub fn toggle_stream(&mut self) -> bool {
        self.streaming = !self.streaming;
        self.streaming
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    pub fn stream_label(&self) -> &'static str {
        if self.streaming {
            "LIVE"
        } else {
            "PAUSED"
        }
    }
}

/// Latest map image and pose.
#[derive(Debug, Clone, Default)]
pub struct MapView {
    pub position: Option<Position>,
    pub heading: Option<f64>,
    pub image_path: Option<PathBuf>,
    pub image_bytes: usize,
    pub updated_at: Option<DateTime<Local>>,
}

impl MapView {
    pub fn apply(&mut self, report: &MapReport, image_path: PathBuf, image_bytes: usize, at: DateTime<Local>) {
        self.position = Some(report.position.into());
        self.heading = Some(report.heading);
        self.image_path = Some(image_path);
        self.image_bytes = image_bytes;
        self.updated_at = Some(at);
    }

    pub fn position_label(&self) -> String {
        self.position
            .map(|p| p.compact_label())
            .unwrap_or_else(|| "--".to_string())
    }

    pub fn heading_label(&self) -> String {
        self.heading.map(heading_label).unwrap_or_else(|| "--".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(left: bool, center: bool, right: bool) -> ObstacleAnalysis {
        ObstacleAnalysis { left, center, right }
    }

    #[test]
    fn test_advice_decision_table() {
        assert_eq!(
            analysis(false, true, false).advice(),
            "Obstacle ahead! Turn left or right to avoid."
        );
        assert_eq!(
            analysis(true, true, true).advice(),
            "Obstacle ahead! Turn left or right to avoid."
        );
        assert_eq!(
            analysis(true, false, false).advice(),
            "Obstacle on left. Safe to turn right."
        );
        assert_eq!(
            analysis(false, false, true).advice(),
            "Obstacle on right. Safe to turn left."
        );
        assert_eq!(
            analysis(false, false, false).advice(),
            "Path is clear. Safe to move forward."
        );
        assert_eq!(
            analysis(true, false, true).advice(),
            "Obstacles on both sides. Proceed forward carefully."
        );
    }

    #[test]
    fn test_rows_and_conversion() {
        let a = ObstacleAnalysis::from(ApiObstacleAnalysis {
            left_obstacle: true,
            center_obstacle: false,
            right_obstacle: false,
        });
        let rows = a.rows();
        assert_eq!(rows[0], ("Left", true));
        assert_eq!(rows[1], ("Center", false));
        assert_eq!(rows[2], ("Right", false));
        assert_eq!(yes_no(rows[0].1), "Yes");
        assert_eq!(yes_no(rows[1].1), "No");
        assert!(a.any());
    }

    #[test]
    fn test_stream_toggle_is_local() {
        let mut camera = CameraPanel::default();
        assert!(!camera.is_streaming());

        camera.seed_from_camera_test(true);
        assert!(camera.is_streaming());
        assert_eq!(camera.stream_label(), "LIVE");

        assert!(!camera.toggle_stream());
        assert!(camera.toggle_stream());

        camera.seed_from_camera_test(false);
        assert!(!camera.is_streaming());
        assert_eq!(camera.camera_ok, Some(false));
    }

    #[test]
    fn test_map_labels() {
        let mut map = MapView::default();
        assert_eq!(map.position_label(), "--");
        assert_eq!(map.heading_label(), "--");

        let report = MapReport {
            map: String::new(),
            position: [1.23, 4.56],
            heading: 90.6,
        };
        map.apply(&report, PathBuf::from("media/map.png"), 42, Local::now());

        assert_eq!(map.position_label(), "1.2, 4.6");
        assert_eq!(map.heading_label(), "91°");
        assert_eq!(map.image_bytes, 42);
    }
}
