//! Session: the single owner of console state.
//!
//! Requests run in spawned tasks and report back as [`SessionEvent`]s through
//! an unbounded channel. Only [`Session::apply`] mutates state, and it runs on
//! the main loop.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use rover_telemetry::log_event;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{
    ApiError, CommandRequest, MapReport, MovementLogReport, Outcome, RobotApi, SnapshotReport,
    StatusReport, SystemInfoReport,
};
use crate::domain::{
    command_label, resolve, Action, App, AppState, ConfirmAction, Endpoint, InFlightTracker, Key,
    MoveCommand, MovementLogEntry, Severity, Snapshot, Ticket, NOTIFICATION_TTL, PULSE_DURATION,
};
use crate::media::{ImageKind, ImageStore, MediaError, SavedImage};

/// Failure of a request whose payload is also written to disk.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Timings and defaults for a session.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub status_interval: Duration,
    pub map_interval: Duration,
    /// Delay between a command reply and the log reload that reconciles it
    pub reconcile_delay: Duration,
    pub notification_ttl: Duration,
    pub pulse: Duration,
    /// Seconds sent with each movement command
    pub command_duration: f64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            status_interval: Duration::from_secs(2),
            map_interval: Duration::from_secs(15),
            reconcile_delay: Duration::from_millis(100),
            notification_ttl: NOTIFICATION_TTL,
            pulse: PULSE_DURATION,
            command_duration: 1.0,
        }
    }
}

/// A decoded map image with the pose it was drawn at.
#[derive(Debug, Clone)]
pub struct MapFrame {
    pub report: MapReport,
    pub image: SavedImage,
}

/// A decoded camera frame with its obstacle analysis.
#[derive(Debug, Clone)]
pub struct SnapshotFrame {
    pub report: SnapshotReport,
    pub image: SavedImage,
}

/// Completion of a background request.
#[derive(Debug)]
pub enum SessionEvent {
    CameraTested(Result<Outcome, ApiError>),
    Status(Ticket, Result<StatusReport, ApiError>),
    SystemInfo(Ticket, Result<SystemInfoReport, ApiError>),
    MovementLog(Ticket, Result<MovementLogReport, ApiError>),
    Map(Ticket, Result<MapFrame, PanelError>),
    Snapshot(Ticket, Result<SnapshotFrame, PanelError>),
    Connected(Result<Outcome, ApiError>),
    Disconnected(Result<Outcome, ApiError>),
    CommandSent {
        command: MoveCommand,
        result: Result<Outcome, ApiError>,
    },
    SpeedSet {
        speed: u8,
        result: Result<Outcome, ApiError>,
    },
    Navigation {
        target: String,
        result: Result<Outcome, ApiError>,
    },
    Exploration(Result<Outcome, ApiError>),
    StreamToggled {
        active: bool,
        result: Result<Outcome, ApiError>,
    },
    SystemReset(Result<Outcome, ApiError>),
    /// Time to reload the log after a command
    ReconcileLog,
}

pub struct Session {
    app: App,
    api: Arc<dyn RobotApi>,
    images: ImageStore,
    config: ConsoleConfig,
    inflight: InFlightTracker,
    tx: UnboundedSender<SessionEvent>,
    rx: UnboundedReceiver<SessionEvent>,
    next_status_at: Option<Instant>,
    next_map_at: Option<Instant>,
}

impl Session {
    pub fn new(api: Arc<dyn RobotApi>, images: ImageStore, config: ConsoleConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new().with_timings(config.notification_ttl, config.pulse);
        Self {
            app,
            api,
            images,
            config,
            inflight: InFlightTracker::new(),
            tx,
            rx,
            next_status_at: None,
            next_map_at: None,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn is_in_flight(&self, endpoint: Endpoint) -> bool {
        self.inflight.is_in_flight(endpoint)
    }

    pub fn should_quit(&self) -> bool {
        self.app.should_quit()
    }

    /// Initial fetches, then arm the periodic timers.
    pub fn start(&mut self, now: Instant) {
        log_event!(info, "session", "Session starting");
        self.test_camera();
        self.fetch_system_info();
        self.refresh_status();
        self.refresh_map();
        self.load_log();
        self.next_status_at = Some(now + self.config.status_interval);
        self.next_map_at = Some(now + self.config.map_interval);
    }

    /// Fire due timers and expire transient UI state.
    pub fn tick(&mut self, now: Instant) {
        self.app.tick(now);

        if self.next_status_at.is_some_and(|at| now >= at) {
            self.refresh_status();
            self.next_status_at = Some(now + self.config.status_interval);
        }
        if self.next_map_at.is_some_and(|at| now >= at) {
            self.refresh_map();
            self.next_map_at = Some(now + self.config.map_interval);
        }
    }

    /// Wait for the next background completion.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Apply every completion already queued. Returns how many were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = SessionEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away with the session.
            let _ = tx.send(task.await);
        });
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn handle_key(&mut self, key: Key, now: Instant) {
        if resolve(key, self.app.focus()) == Some(Action::Quit) {
            self.app.state = AppState::Quit;
            return;
        }

        match self.app.state {
            AppState::Dashboard => {
                if let Some(action) = resolve(key, self.app.focus()) {
                    self.perform(action, now);
                }
            }
            AppState::Help | AppState::Snapshot => {
                // Any key closes
                self.app.state = AppState::Dashboard;
            }
            AppState::Confirm(action) => match key {
                Key::Char('y') | Key::Char('Y') => {
                    self.app.state = AppState::Dashboard;
                    self.confirmed(action);
                }
                Key::Char('n') | Key::Char('N') | Key::Esc => {
                    self.app.state = AppState::Dashboard;
                }
                _ => {}
            },
            AppState::NavigateInput => match key {
                Key::Enter => {
                    let target = self.app.take_input();
                    self.navigate(target);
                }
                Key::Esc => self.app.cancel_input(),
                Key::Backspace => self.app.pop_input(),
                Key::Char(c) => self.app.push_input(c),
                _ => {}
            },
            AppState::Quit => {}
        }
    }

    pub fn perform(&mut self, action: Action, now: Instant) {
        match action {
            Action::Move(command) => self.send_command(command, now),
            Action::Disconnect => self.disconnect(),
            Action::ToggleFullscreen => {
                self.app.camera.toggle_fullscreen();
            }
            Action::Connect => {
                if self.app.connection.connect_enabled() {
                    self.connect();
                }
            }
            Action::OpenNavigate => self.app.open_navigate_prompt(),
            Action::Explore => self.explore(),
            Action::Snapshot => {
                self.take_snapshot();
            }
            Action::ToggleStream => self.toggle_stream(),
            Action::RefreshMap => {
                self.refresh_map();
            }
            Action::TestCamera => self.test_camera(),
            Action::ClearLog => self.app.state = AppState::Confirm(ConfirmAction::ClearLog),
            Action::ResetSystem => self.app.state = AppState::Confirm(ConfirmAction::ResetSystem),
            Action::SpeedUp | Action::SpeedDown => {
                if let Some(speed) = self.app.stepped_speed(action == Action::SpeedUp) {
                    self.set_speed(speed);
                }
            }
            Action::DismissNotification => {
                self.app.notifications.dismiss();
            }
            Action::Help => self.app.state = AppState::Help,
            Action::Quit => self.app.state = AppState::Quit,
        }
    }

    fn confirmed(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::ClearLog => {
                self.app.movement_log.clear();
                log_event!(info, "movement_log", "Movement log cleared");
                self.app.notifications.notify("Movement log cleared", Severity::Info);
            }
            ConfirmAction::ResetSystem => self.reset_system(),
        }
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// Dispatch a movement command and pulse its control.
    pub fn send_command(&mut self, command: MoveCommand, now: Instant) {
        self.app.start_pulse(command, now);
        log_event!(debug, "dispatcher", "Sending command", command = command.as_str());

        let api = Arc::clone(&self.api);
        let request = CommandRequest::movement(command.as_str(), self.config.command_duration);
        self.spawn(async move {
            let result = api.send_command(&request).await;
            SessionEvent::CommandSent { command, result }
        });
    }

    pub fn set_speed(&mut self, speed: u8) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.send_command(&CommandRequest::set_speed(speed)).await;
            SessionEvent::SpeedSet { speed, result }
        });
    }

    /// Poll status unless a poll is still outstanding.
    pub fn refresh_status(&mut self) -> Option<Ticket> {
        let ticket = self.inflight.try_begin(Endpoint::Status)?;
        let api = Arc::clone(&self.api);
        self.spawn(async move { SessionEvent::Status(ticket, api.status().await) });
        Some(ticket)
    }

    pub fn fetch_system_info(&mut self) -> Option<Ticket> {
        let ticket = self.inflight.try_begin(Endpoint::SystemInfo)?;
        let api = Arc::clone(&self.api);
        self.spawn(async move { SessionEvent::SystemInfo(ticket, api.system_info().await) });
        Some(ticket)
    }

    /// Reload the movement log. Supersedes any reload still outstanding.
    pub fn load_log(&mut self) -> Ticket {
        let ticket = self.inflight.begin_superseding(Endpoint::MovementLog);
        let api = Arc::clone(&self.api);
        self.spawn(async move { SessionEvent::MovementLog(ticket, api.movement_log().await) });
        ticket
    }

    pub fn refresh_map(&mut self) -> Option<Ticket> {
        let ticket = self.inflight.try_begin(Endpoint::Map)?;
        let api = Arc::clone(&self.api);
        let images = self.images.clone();
        self.spawn(async move { SessionEvent::Map(ticket, fetch_map(api, images).await) });
        Some(ticket)
    }

    pub fn take_snapshot(&mut self) -> Option<Ticket> {
        let Some(ticket) = self.inflight.try_begin(Endpoint::Snapshot) else {
            log_event!(debug, "panels", "Snapshot already in progress");
            return None;
        };
        let api = Arc::clone(&self.api);
        let images = self.images.clone();
        self.spawn(async move { SessionEvent::Snapshot(ticket, fetch_snapshot(api, images).await) });
        Some(ticket)
    }

    /// Flip the local stream flag, then ask the server to follow.
    pub fn toggle_stream(&mut self) {
        let active = self.app.camera.toggle_stream();
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.set_streaming(active).await;
            SessionEvent::StreamToggled { active, result }
        });
    }

    pub fn test_camera(&mut self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { SessionEvent::CameraTested(api.test_camera().await) });
    }

    pub fn connect(&mut self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { SessionEvent::Connected(api.connect().await) });
    }

    pub fn disconnect(&mut self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { SessionEvent::Disconnected(api.disconnect().await) });
    }

    pub fn navigate(&mut self, target: String) {
        if target.is_empty() {
            self.app
                .notifications
                .notify("Please enter a navigation target", Severity::Warning);
            return;
        }
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.navigate(&target).await;
            SessionEvent::Navigation { target, result }
        });
    }

    pub fn explore(&mut self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { SessionEvent::Exploration(api.explore().await) });
    }

    fn reset_system(&mut self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { SessionEvent::SystemReset(api.reset().await) });
    }

    fn schedule_reconcile(&self) {
        let delay = self.config.reconcile_delay;
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            SessionEvent::ReconcileLog
        });
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CameraTested(result) => self.on_camera_tested(result),
            SessionEvent::Status(ticket, result) => {
                if self.settle(ticket) {
                    self.on_status(result);
                }
            }
            SessionEvent::SystemInfo(ticket, result) => {
                if !self.settle(ticket) {
                    return;
                }
                match result {
                    Ok(info) => self.app.telemetry.apply_system_info(info),
                    Err(e) => log_event!(debug, "telemetry", "System info unavailable", error = %e),
                }
            }
            SessionEvent::MovementLog(ticket, result) => {
                if !self.settle(ticket) {
                    return;
                }
                match result {
                    Ok(report) => {
                        let count = report.movements.len();
                        self.app
                            .movement_log
                            .replace_with_authoritative(report.movements, report.total_movements);
                        log_event!(debug, "movement_log", "Movement log loaded", entries = count);
                    }
                    Err(e) => log_event!(debug, "movement_log", "Movement log unavailable", error = %e),
                }
            }
            SessionEvent::Map(ticket, result) => {
                if !self.settle(ticket) {
                    return;
                }
                match result {
                    Ok(frame) => self.app.map.apply(
                        &frame.report,
                        frame.image.path,
                        frame.image.bytes,
                        Local::now(),
                    ),
                    Err(e) => log_event!(debug, "panels", "Map refresh failed", error = %e),
                }
            }
            SessionEvent::Snapshot(ticket, result) => {
                if self.settle(ticket) {
                    self.on_snapshot(result);
                }
            }
            SessionEvent::Connected(result) => self.on_connected(result),
            SessionEvent::Disconnected(result) => match result {
                Ok(outcome) => {
                    self.app.connection.set_connection_state(false);
                    self.app
                        .notifications
                        .notify(outcome.message_or("Robot disconnected"), Severity::Info);
                }
                Err(e) => self.notify_failure("Disconnect error", e),
            },
            SessionEvent::CommandSent { command, result } => self.on_command(command, result),
            SessionEvent::SpeedSet { speed, result } => match result {
                Ok(_) => {
                    self.app.speed = speed;
                    self.app
                        .notifications
                        .notify(format!("Speed set to {}", speed), Severity::Info);
                }
                Err(e) => self.notify_failure("Speed change failed", e),
            },
            SessionEvent::Navigation { target, result } => match result {
                Ok(outcome) => {
                    let fallback = format!("Navigating to {}", target);
                    self.app
                        .notifications
                        .notify(outcome.message_or(&fallback), Severity::Info);
                }
                Err(e) => self.notify_failure("Navigation failed", e),
            },
            SessionEvent::Exploration(result) => match result {
                Ok(outcome) => {
                    self.app
                        .notifications
                        .notify(outcome.message_or("Exploration started"), Severity::Success);
                }
                Err(e) => self.notify_failure("Exploration failed", e),
            },
            SessionEvent::StreamToggled { active, result } => match result {
                Ok(_) => log_event!(debug, "panels", "Stream state sent", active = active),
                Err(e) => {
                    let verb = if active { "start" } else { "stop" };
                    self.app.notifications.notify(
                        format!("Failed to {} stream: {}", verb, e),
                        Severity::Warning,
                    );
                }
            },
            SessionEvent::SystemReset(result) => match result {
                Ok(outcome) => {
                    self.app.movement_log.clear();
                    self.app.last_command = None;
                    self.app
                        .notifications
                        .notify(outcome.message_or("System reset"), Severity::Success);
                    self.refresh_status();
                    self.load_log();
                }
                Err(e) => self.notify_failure("Reset failed", e),
            },
            SessionEvent::ReconcileLog => {
                self.load_log();
            }
        }
    }

    /// Settle a ticket, logging stale completions.
    fn settle(&mut self, ticket: Ticket) -> bool {
        let current = self.inflight.complete(ticket);
        if !current {
            log_event!(
                debug,
                "session",
                "Dropping stale response",
                endpoint = ticket.endpoint.name(),
                generation = ticket.generation
            );
        }
        current
    }

    fn on_camera_tested(&mut self, result: Result<Outcome, ApiError>) {
        match result {
            Ok(outcome) => {
                self.app.camera.seed_from_camera_test(true);
                self.app
                    .notifications
                    .notify(outcome.message_or("Camera is working"), Severity::Success);
            }
            Err(e) => {
                self.app.camera.seed_from_camera_test(false);
                self.app
                    .notifications
                    .notify(format!("Camera test failed: {}", e), Severity::Warning);
            }
        }
    }

    fn on_status(&mut self, result: Result<StatusReport, ApiError>) {
        match result {
            Ok(report) => {
                let connected = self.app.telemetry.apply_status(report, Local::now());
                self.app.connection.set_connection_state(connected);
            }
            Err(e) => {
                let failures = self.app.telemetry.record_failure();
                log_event!(debug, "telemetry", "Status poll failed", error = %e, consecutive = failures);
            }
        }
    }

    fn on_snapshot(&mut self, result: Result<SnapshotFrame, PanelError>) {
        match result {
            Ok(frame) => {
                if frame.report.camera_available.is_some() {
                    self.app.telemetry.camera_available = frame.report.camera_available;
                }
                let snapshot = Snapshot {
                    analysis: frame.report.analysis.into(),
                    image_path: frame.image.path,
                    image_bytes: frame.image.bytes,
                    taken_at: Local::now(),
                };
                log_event!(info, "panels", "Snapshot captured", advice = snapshot.analysis.advice());
                self.app.camera.last_snapshot = Some(snapshot);
                if self.app.state == AppState::Dashboard {
                    self.app.state = AppState::Snapshot;
                } else {
                    self.app.notifications.notify("Snapshot captured", Severity::Info);
                }
            }
            Err(PanelError::Api(e)) => self.notify_failure("Snapshot failed", e),
            Err(e) => {
                self.app
                    .notifications
                    .notify(format!("Snapshot failed: {}", e), Severity::Error);
            }
        }
    }

    fn on_connected(&mut self, result: Result<Outcome, ApiError>) {
        match result {
            Ok(outcome) => {
                self.app.connection.set_connection_state(true);
                self.app
                    .notifications
                    .notify(outcome.message_or("Connected to robot"), Severity::Success);
                self.refresh_status();
            }
            Err(e) => self.notify_failure("Connection error", e),
        }
    }

    fn on_command(&mut self, command: MoveCommand, result: Result<Outcome, ApiError>) {
        match result {
            Ok(_) => {
                self.app.last_command = Some(command_label(command.as_str()));
                self.app
                    .movement_log
                    .append_optimistic(MovementLogEntry::provisional(command.as_str(), Local::now()));
                log_event!(debug, "dispatcher", "Command accepted", command = command.as_str());
                self.schedule_reconcile();
            }
            Err(e) if e.is_rejection() => {
                self.app
                    .notifications
                    .notify(format!("Command failed: {}", e), Severity::Warning);
                self.schedule_reconcile();
            }
            Err(e) => {
                self.app
                    .notifications
                    .notify(format!("Command error: {}", e), Severity::Error);
            }
        }
    }

    /// Rejections warn with the server's reason; transport failures are errors.
    fn notify_failure(&mut self, context: &str, error: ApiError) {
        let severity = if error.is_rejection() {
            Severity::Warning
        } else {
            Severity::Error
        };
        self.app
            .notifications
            .notify(format!("{}: {}", context, error), severity);
    }
}

async fn fetch_map(api: Arc<dyn RobotApi>, images: ImageStore) -> Result<MapFrame, PanelError> {
    let report = api.map().await?;
    let image = images.save(ImageKind::Map, &report.map).await?;
    Ok(MapFrame { report, image })
}

async fn fetch_snapshot(
    api: Arc<dyn RobotApi>,
    images: ImageStore,
) -> Result<SnapshotFrame, PanelError> {
    let report = api.snapshot().await?;
    let image = images.save(ImageKind::Snapshot, &report.image).await?;
    Ok(SnapshotFrame { report, image })
}
