//! End-to-end session behaviour against an in-memory robot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::time::timeout;

use rover_console::api::{
    ApiError, ApiMovement, ApiObstacleAnalysis, ApiRobotStatus, ApiSystemInfo, CommandRequest,
    MapReport, MovementLogReport, Outcome, RobotApi, SnapshotReport, StatusReport,
    SystemInfoReport,
};
use rover_console::domain::{
    AppState, BatteryBand, BatteryGauge, ConfirmAction, Endpoint, Key, MoveCommand, Provenance,
    Severity, MAX_VISIBLE_ENTRIES,
};
use rover_console::media::ImageStore;
use rover_console::{ConsoleConfig, Session, SessionEvent};

#[derive(Debug, Clone)]
enum Reply {
    Accept,
    Reject(&'static str),
    Unreachable,
}

impl Reply {
    fn outcome(&self, message: &str) -> Result<Outcome, ApiError> {
        match self {
            Reply::Accept => Ok(Outcome::ok(message)),
            Reply::Reject(reason) => Err(ApiError::Rejected(reason.to_string())),
            Reply::Unreachable => Err(ApiError::Connection("Cannot connect to robot".to_string())),
        }
    }
}

struct MockRobot {
    calls: Mutex<Vec<&'static str>>,
    commands: Mutex<Vec<CommandRequest>>,
    targets: Mutex<Vec<String>>,
    command_reply: Mutex<Reply>,
    stream_reply: Mutex<Reply>,
    camera_ok: AtomicBool,
    status: Mutex<Option<ApiRobotStatus>>,
    status_delay: Mutex<Duration>,
    movements: Mutex<Vec<ApiMovement>>,
    analysis: Mutex<ApiObstacleAnalysis>,
    snapshot_image: Mutex<String>,
}

impl MockRobot {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
            targets: Mutex::new(Vec::new()),
            command_reply: Mutex::new(Reply::Accept),
            stream_reply: Mutex::new(Reply::Accept),
            camera_ok: AtomicBool::new(true),
            status: Mutex::new(None),
            status_delay: Mutex::new(Duration::ZERO),
            movements: Mutex::new(Vec::new()),
            analysis: Mutex::new(ApiObstacleAnalysis::default()),
            snapshot_image: Mutex::new(STANDARD.encode(b"jpeg-frame")),
        })
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    fn set_status(&self, status: Option<ApiRobotStatus>) {
        *self.status.lock().unwrap() = status;
    }

    fn set_movements(&self, movements: Vec<ApiMovement>) {
        *self.movements.lock().unwrap() = movements;
    }
}

#[async_trait]
impl RobotApi for MockRobot {
    async fn test_camera(&self) -> Result<Outcome, ApiError> {
        self.record("test_camera");
        if self.camera_ok.load(Ordering::SeqCst) {
            Ok(Outcome::ok("Camera is working"))
        } else {
            Err(ApiError::Rejected("Camera not available".to_string()))
        }
    }

    async fn connect(&self) -> Result<Outcome, ApiError> {
        self.record("connect");
        Ok(Outcome::ok("Connected to robot"))
    }

    async fn disconnect(&self) -> Result<Outcome, ApiError> {
        self.record("disconnect");
        Ok(Outcome::ok("Disconnected from robot"))
    }

    async fn send_command(&self, request: &CommandRequest) -> Result<Outcome, ApiError> {
        self.record("command");
        self.commands.lock().unwrap().push(request.clone());
        let reply = self.command_reply.lock().unwrap().clone();
        reply.outcome("Command executed")
    }

    async fn navigate(&self, target: &str) -> Result<Outcome, ApiError> {
        self.record("navigate");
        self.targets.lock().unwrap().push(target.to_string());
        Ok(Outcome::ok(format!("Navigating to: {}", target)))
    }

    async fn explore(&self) -> Result<Outcome, ApiError> {
        self.record("explore");
        Ok(Outcome::ok("Exploration started"))
    }

    async fn set_streaming(&self, active: bool) -> Result<Outcome, ApiError> {
        self.record(if active { "start_stream" } else { "stop_stream" });
        let reply = self.stream_reply.lock().unwrap().clone();
        reply.outcome("ok")
    }

    async fn snapshot(&self) -> Result<SnapshotReport, ApiError> {
        self.record("snapshot");
        Ok(SnapshotReport {
            image: self.snapshot_image.lock().unwrap().clone(),
            analysis: *self.analysis.lock().unwrap(),
            camera_available: Some(true),
        })
    }

    async fn map(&self) -> Result<MapReport, ApiError> {
        self.record("map");
        Ok(MapReport {
            map: STANDARD.encode(b"png-map"),
            position: [2.0, 3.0],
            heading: 45.0,
        })
    }

    async fn status(&self) -> Result<StatusReport, ApiError> {
        self.record("status");
        let delay = *self.status_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let status = self.status.lock().unwrap().clone();
        match status {
            Some(status) => Ok(StatusReport {
                status,
                camera_available: Some(true),
                arduino_connected: Some(false),
            }),
            None => Err(ApiError::Connection("Cannot connect to robot".to_string())),
        }
    }

    async fn system_info(&self) -> Result<SystemInfoReport, ApiError> {
        self.record("system_info");
        Ok(ApiSystemInfo {
            camera_resolution: [640, 480],
            arduino_port: None,
            map_size: [100, 100],
            frame_rate: None,
        })
    }

    async fn movement_log(&self) -> Result<MovementLogReport, ApiError> {
        self.record("movement_log");
        let movements = self.movements.lock().unwrap().clone();
        let total = movements.len() as u64;
        Ok(MovementLogReport {
            movements,
            total_movements: Some(total),
        })
    }

    async fn reset(&self) -> Result<Outcome, ApiError> {
        self.record("reset");
        Ok(Outcome::ok("System reset successfully"))
    }
}

fn movement(index: usize, command: &str) -> ApiMovement {
    ApiMovement {
        timestamp: format!("2024-05-01T10:{:02}:00.000000", index),
        command: command.to_string(),
        position: [index as f64, 0.5],
        heading: 0.0,
        status: None,
    }
}

fn sample_status() -> ApiRobotStatus {
    ApiRobotStatus {
        position: [1.23, 4.56],
        heading: 91.0,
        speed: 150.0,
        battery: 45.0,
        obstacles_detected: 2,
        connected: true,
        movements_recorded: 4,
        status: Some("Simulated Mode".to_string()),
        last_command: Some("forward".to_string()),
    }
}

struct Harness {
    robot: Arc<MockRobot>,
    session: Session,
    _media: tempfile::TempDir,
}

fn harness() -> Harness {
    let robot = MockRobot::new();
    let media = tempfile::tempdir().unwrap();
    let config = ConsoleConfig {
        reconcile_delay: Duration::from_millis(10),
        ..ConsoleConfig::default()
    };
    let session = Session::new(robot.clone(), ImageStore::new(media.path()), config);
    Harness {
        robot,
        session,
        _media: media,
    }
}

/// Apply completions until the session has been quiet for a while.
async fn settle(session: &mut Session) {
    while let Ok(Some(event)) = timeout(Duration::from_millis(250), session.next_event()).await {
        session.apply(event);
    }
}

async fn next(session: &mut Session) -> SessionEvent {
    timeout(Duration::from_secs(2), session.next_event())
        .await
        .expect("event in time")
        .expect("channel open")
}

fn press(session: &mut Session, key: Key) {
    session.handle_key(key, Instant::now());
}

#[tokio::test]
async fn test_startup_fetches_everything() {
    let mut h = harness();
    h.robot.set_status(Some(sample_status()));

    h.session.start(Instant::now());
    settle(&mut h.session).await;

    for call in ["test_camera", "system_info", "status", "map", "movement_log"] {
        assert_eq!(h.robot.count(call), 1, "{}", call);
    }

    let app = h.session.app();
    assert!(app.camera.is_streaming());
    assert_eq!(app.camera.camera_ok, Some(true));
    let info = app.telemetry.system_info.as_ref().unwrap();
    assert_eq!(info.frame_rate_label(), "30 fps");
    assert_eq!(info.port_label(), "Not configured");
    assert_eq!(app.map.position_label(), "2.0, 3.0");
    assert_eq!(app.map.heading_label(), "45°");
    assert!(app.map.image_path.as_ref().unwrap().exists());
}

#[tokio::test]
async fn test_forward_key_dispatches_and_reconciles() {
    let mut h = harness();
    h.robot.set_movements(vec![movement(1, "forward")]);

    press(&mut h.session, Key::Char('w'));
    assert!(h.session.app().is_pulsing(MoveCommand::Forward));

    let event = next(&mut h.session).await;
    assert!(matches!(event, SessionEvent::CommandSent { .. }));
    h.session.apply(event);

    let app = h.session.app();
    assert_eq!(app.last_command.as_deref(), Some("FORWARD"));
    let top = app.movement_log.entries().next().unwrap();
    assert_eq!(top.command, "forward");
    assert_eq!(top.provenance, Provenance::Provisional);
    assert_eq!(top.position_label(), "0.0, 0.0");
    assert_eq!(top.heading_label(), "0°");

    settle(&mut h.session).await;

    let commands = h.robot.commands.lock().unwrap().clone();
    assert_eq!(commands, vec![CommandRequest::movement("forward", 1.0)]);
    assert_eq!(h.robot.calls(), vec!["command", "movement_log"]);

    let top = h.session.app().movement_log.entries().next().unwrap();
    assert_eq!(top.provenance, Provenance::Confirmed);
    assert_eq!(top.position_label(), "1.0, 0.5");
}

#[tokio::test]
async fn test_keys_suppressed_while_typing_target() {
    let mut h = harness();

    press(&mut h.session, Key::Char('n'));
    assert_eq!(h.session.app().state, AppState::NavigateInput);

    for key in [Key::Char('w'), Key::Up, Key::Char(' '), Key::Char('f')] {
        press(&mut h.session, key);
    }
    assert!(timeout(Duration::from_millis(150), h.session.next_event())
        .await
        .is_err());
    assert!(h.robot.calls().is_empty());
    assert!(!h.session.app().camera.fullscreen);
    assert_eq!(h.session.app().navigate_input, "w f");

    press(&mut h.session, Key::Backspace);
    press(&mut h.session, Key::Backspace);
    press(&mut h.session, Key::Enter);
    settle(&mut h.session).await;

    assert_eq!(h.robot.targets.lock().unwrap().clone(), vec!["w".to_string()]);
    let notification = h.session.app().notifications.current().unwrap();
    assert_eq!(notification.severity, Severity::Info);
    assert_eq!(notification.message, "Navigating to: w");
}

#[tokio::test]
async fn test_empty_navigation_target_warns_locally() {
    let mut h = harness();

    press(&mut h.session, Key::Char('n'));
    press(&mut h.session, Key::Char(' '));
    press(&mut h.session, Key::Enter);
    settle(&mut h.session).await;

    assert_eq!(h.robot.count("navigate"), 0);
    let notification = h.session.app().notifications.current().unwrap();
    assert_eq!(notification.severity, Severity::Warning);
}

#[tokio::test]
async fn test_status_poll_updates_telemetry() {
    let mut h = harness();
    h.robot.set_status(Some(sample_status()));

    assert!(h.session.refresh_status().is_some());
    settle(&mut h.session).await;

    let app = h.session.app();
    let status = app.telemetry.status.as_ref().unwrap();
    assert_eq!(status.position.detail_label(), "1.23, 4.56");
    assert_eq!(status.heading_label(), "91°");

    let gauge = BatteryGauge::new(status.battery);
    assert_eq!(gauge.label(), "45%");
    assert_eq!(gauge.band(), BatteryBand::Amber);
    assert_eq!(gauge.fill_width_percent(), 55.0);

    assert!(app.connection.is_connected());
    assert_eq!(app.connection.status_text(), "Connected");
    assert!(!app.connection.connect_enabled());
    assert_eq!(app.telemetry.arduino_connected, Some(false));
}

#[tokio::test]
async fn test_status_failure_keeps_previous_values_quietly() {
    let mut h = harness();
    h.robot.set_status(Some(sample_status()));
    h.session.refresh_status();
    settle(&mut h.session).await;

    h.robot.set_status(None);
    h.session.refresh_status();
    settle(&mut h.session).await;

    let app = h.session.app();
    assert_eq!(
        app.telemetry.status.as_ref().unwrap().position.detail_label(),
        "1.23, 4.56"
    );
    assert_eq!(app.telemetry.failed_polls, 1);
    assert!(app.notifications.current().is_none());
    assert!(app.connection.is_connected());
}

#[tokio::test]
async fn test_status_poll_not_reissued_while_outstanding() {
    let mut h = harness();
    h.robot.set_status(Some(sample_status()));
    *h.robot.status_delay.lock().unwrap() = Duration::from_millis(100);

    assert!(h.session.refresh_status().is_some());
    assert!(h.session.refresh_status().is_none());
    assert!(h.session.is_in_flight(Endpoint::Status));

    settle(&mut h.session).await;
    assert_eq!(h.robot.count("status"), 1);
    assert!(!h.session.is_in_flight(Endpoint::Status));
    assert!(h.session.refresh_status().is_some());
}

#[tokio::test]
async fn test_snapshot_with_left_obstacle() {
    let mut h = harness();
    *h.robot.analysis.lock().unwrap() = ApiObstacleAnalysis {
        left_obstacle: true,
        center_obstacle: false,
        right_obstacle: false,
    };

    press(&mut h.session, Key::Char('p'));
    settle(&mut h.session).await;

    let app = h.session.app();
    assert_eq!(app.state, AppState::Snapshot);
    let snapshot = app.camera.last_snapshot.as_ref().unwrap();
    assert_eq!(snapshot.analysis.advice(), "Obstacle on left. Safe to turn right.");
    assert_eq!(snapshot.analysis.rows()[0], ("Left", true));
    assert_eq!(std::fs::read(&snapshot.image_path).unwrap(), b"jpeg-frame");

    press(&mut h.session, Key::Char('w'));
    assert_eq!(h.session.app().state, AppState::Dashboard);
    assert!(timeout(Duration::from_millis(100), h.session.next_event())
        .await
        .is_err());
}

#[tokio::test]
async fn test_log_shows_ten_newest_entries() {
    let mut h = harness();
    h.robot
        .set_movements((0..25).map(|i| movement(i, &format!("cmd{}", i))).collect());

    h.session.load_log();
    settle(&mut h.session).await;

    let log = &h.session.app().movement_log;
    assert_eq!(log.visible_rows(), MAX_VISIBLE_ENTRIES);
    let commands: Vec<_> = log.entries().map(|e| e.command.clone()).collect();
    let expected: Vec<_> = (15..25).rev().map(|i| format!("cmd{}", i)).collect();
    assert_eq!(commands, expected);
    assert_eq!(log.total_recorded(), Some(25));
}

#[tokio::test]
async fn test_clear_log_requires_confirmation() {
    let mut h = harness();
    h.robot.set_movements(vec![movement(1, "forward"), movement(2, "left")]);
    h.session.load_log();
    settle(&mut h.session).await;

    press(&mut h.session, Key::Char('l'));
    assert_eq!(h.session.app().state, AppState::Confirm(ConfirmAction::ClearLog));
    press(&mut h.session, Key::Char('n'));
    assert_eq!(h.session.app().state, AppState::Dashboard);
    assert_eq!(h.session.app().movement_log.visible_rows(), 2);
    assert!(h.session.app().notifications.current().is_none());

    press(&mut h.session, Key::Char('l'));
    press(&mut h.session, Key::Char('y'));

    let app = h.session.app();
    assert!(app.movement_log.is_placeholder());
    assert_eq!(app.movement_log.visible_rows(), 1);
    let notification = app.notifications.current().unwrap();
    assert_eq!(notification.severity, Severity::Info);
}

#[tokio::test]
async fn test_stale_log_response_is_dropped() {
    let mut h = harness();

    let first = h.session.load_log();
    let second = h.session.load_log();

    h.session.apply(SessionEvent::MovementLog(
        first,
        Ok(MovementLogReport {
            movements: vec![movement(1, "stale")],
            total_movements: Some(1),
        }),
    ));
    assert!(h.session.app().movement_log.is_placeholder());

    h.session.apply(SessionEvent::MovementLog(
        second,
        Ok(MovementLogReport {
            movements: vec![movement(2, "fresh")],
            total_movements: Some(1),
        }),
    ));
    let top = h.session.app().movement_log.entries().next().unwrap();
    assert_eq!(top.command, "fresh");
}

#[tokio::test]
async fn test_transport_failure_adds_no_row() {
    let mut h = harness();
    *h.robot.command_reply.lock().unwrap() = Reply::Unreachable;

    press(&mut h.session, Key::Char('w'));
    settle(&mut h.session).await;

    let app = h.session.app();
    assert!(app.movement_log.is_placeholder());
    assert!(app.last_command.is_none());
    assert_eq!(h.robot.count("movement_log"), 0);
    let notification = app.notifications.current().unwrap();
    assert_eq!(notification.severity, Severity::Error);
    assert!(notification.message.starts_with("Command error:"));
}

#[tokio::test]
async fn test_undecodable_snapshot_reports_error() {
    let mut h = harness();
    *h.robot.snapshot_image.lock().unwrap() = "not base64!!".to_string();

    press(&mut h.session, Key::Char('p'));
    settle(&mut h.session).await;

    let app = h.session.app();
    assert_eq!(app.state, AppState::Dashboard);
    assert!(app.camera.last_snapshot.is_none());
    assert!(!h.session.is_in_flight(Endpoint::Snapshot));
    let notification = app.notifications.current().unwrap();
    assert_eq!(notification.severity, Severity::Error);
    assert!(notification.message.starts_with("Snapshot failed:"));
}

#[tokio::test]
async fn test_rejected_command_warns_and_reloads() {
    let mut h = harness();
    *h.robot.command_reply.lock().unwrap() = Reply::Reject("Robot not connected");

    press(&mut h.session, Key::Char('d'));
    settle(&mut h.session).await;

    let app = h.session.app();
    assert!(app.movement_log.is_placeholder());
    assert!(app.last_command.is_none());
    assert_eq!(h.robot.count("movement_log"), 1);
    let notification = app.notifications.current().unwrap();
    assert_eq!(notification.severity, Severity::Warning);
    assert_eq!(notification.message, "Command failed: Robot not connected");
}

#[tokio::test]
async fn test_stream_toggle_flips_even_when_request_fails() {
    let mut h = harness();
    *h.robot.stream_reply.lock().unwrap() = Reply::Unreachable;
    h.session.test_camera();
    settle(&mut h.session).await;
    assert!(h.session.app().camera.is_streaming());

    press(&mut h.session, Key::Char('v'));
    assert!(!h.session.app().camera.is_streaming());
    settle(&mut h.session).await;

    assert!(!h.session.app().camera.is_streaming());
    assert_eq!(h.robot.count("stop_stream"), 1);
    let notification = h.session.app().notifications.current().unwrap();
    assert_eq!(notification.severity, Severity::Warning);
}

#[tokio::test]
async fn test_failed_camera_test_seeds_stream_off() {
    let mut h = harness();
    h.robot.camera_ok.store(false, Ordering::SeqCst);

    press(&mut h.session, Key::Char('t'));
    settle(&mut h.session).await;

    let app = h.session.app();
    assert!(!app.camera.is_streaming());
    assert_eq!(app.camera.camera_ok, Some(false));
    assert_eq!(app.notifications.current().unwrap().severity, Severity::Warning);
}

#[tokio::test]
async fn test_escape_disconnects_without_command() {
    let mut h = harness();
    h.robot.set_status(Some(sample_status()));
    h.session.refresh_status();
    settle(&mut h.session).await;
    assert!(h.session.app().connection.is_connected());

    press(&mut h.session, Key::Esc);
    settle(&mut h.session).await;

    let app = h.session.app();
    assert!(!app.connection.is_connected());
    assert!(app.connection.pulsing());
    assert_eq!(h.robot.count("disconnect"), 1);
    assert_eq!(h.robot.count("command"), 0);
    assert_eq!(app.notifications.current().unwrap().severity, Severity::Info);
}

#[tokio::test]
async fn test_connect_only_when_enabled() {
    let mut h = harness();

    press(&mut h.session, Key::Char('c'));
    settle(&mut h.session).await;
    assert_eq!(h.robot.count("connect"), 1);
    assert!(h.session.app().connection.is_connected());
    assert_eq!(
        h.session.app().notifications.current().unwrap().message,
        "Connected to robot"
    );

    press(&mut h.session, Key::Char('c'));
    settle(&mut h.session).await;
    assert_eq!(h.robot.count("connect"), 1);
}

#[tokio::test]
async fn test_speed_keys_send_set_speed() {
    let mut h = harness();

    press(&mut h.session, Key::Char('+'));
    settle(&mut h.session).await;
    assert_eq!(h.session.app().speed, 175);

    press(&mut h.session, Key::Char('-'));
    press(&mut h.session, Key::Char('-'));
    settle(&mut h.session).await;

    let commands = h.robot.commands.lock().unwrap().clone();
    assert_eq!(commands[0], CommandRequest::set_speed(175));
    assert_eq!(commands.len(), 3);
    // Set-speed never adds a movement row.
    assert!(h.session.app().movement_log.is_placeholder());
    assert_eq!(h.robot.count("movement_log"), 0);
}

#[tokio::test]
async fn test_reset_after_confirmation() {
    let mut h = harness();
    h.robot.set_status(Some(sample_status()));

    press(&mut h.session, Key::Char('w'));
    settle(&mut h.session).await;
    assert!(!h.session.app().movement_log.is_placeholder());

    press(&mut h.session, Key::Char('r'));
    assert_eq!(h.session.app().state, AppState::Confirm(ConfirmAction::ResetSystem));
    press(&mut h.session, Key::Char('y'));
    settle(&mut h.session).await;

    let app = h.session.app();
    assert_eq!(h.robot.count("reset"), 1);
    assert!(app.movement_log.is_placeholder());
    assert!(app.last_command.is_none());
    assert_eq!(app.notifications.current().unwrap().severity, Severity::Success);
}

#[tokio::test]
async fn test_help_and_quit() {
    let mut h = harness();

    press(&mut h.session, Key::Char('?'));
    assert_eq!(h.session.app().state, AppState::Help);
    press(&mut h.session, Key::Char('x'));
    assert_eq!(h.session.app().state, AppState::Dashboard);
    assert!(h.robot.calls().is_empty());

    press(&mut h.session, Key::Char('n'));
    press(&mut h.session, Key::Ctrl('c'));
    assert!(h.session.should_quit());
}
