//! Application state.

use std::time::{Duration, Instant};

use super::{
    CameraPanel, ConnectionView, Focus, MapView, MoveCommand, MovementLog, NotificationCenter,
    TelemetryView,
};

/// How long a control stays highlighted after it fires.
pub const PULSE_DURATION: Duration = Duration::from_millis(200);

/// Base speed sent with `set_speed` before the user changes it.
pub const DEFAULT_SPEED: u8 = 150;

/// Increment for `+` / `-`.
pub const SPEED_STEP: u8 = 25;

/// Longest navigation target accepted by the prompt.
pub const MAX_TARGET_LEN: usize = 64;

/// Destructive actions that need a y/n answer first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    ClearLog,
    ResetSystem,
}

impl ConfirmAction {
    pub fn question(&self) -> &'static str {
        match self {
            ConfirmAction::ClearLog => "Clear the movement log?",
            ConfirmAction::ResetSystem => "Reset the robot system? This clears all recorded data.",
        }
    }
}

/// Application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Main dashboard view.
    #[default]
    Dashboard,
    /// Help overlay.
    Help,
    /// Snapshot result dialog.
    Snapshot,
    /// Waiting for y/n.
    Confirm(ConfirmAction),
    /// Navigation target prompt has focus.
    NavigateInput,
    /// Quitting.
    Quit,
}

/// A highlighted movement control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub command: MoveCommand,
    pub started: Instant,
}

/// Main application model.
#[derive(Debug)]
pub struct App {
    pub state: AppState,
    pub notifications: NotificationCenter,
    pub connection: ConnectionView,
    pub telemetry: TelemetryView,
    pub movement_log: MovementLog,
    pub camera: CameraPanel,
    pub map: MapView,
    /// Display label of the last accepted command, e.g. "SMOOTH LEFT"
    pub last_command: Option<String>,
    pub navigate_input: String,
    pub pulse: Option<Pulse>,
    pub speed: u8,
    pulse_duration: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::Dashboard,
            notifications: NotificationCenter::default(),
            connection: ConnectionView::default(),
            telemetry: TelemetryView::default(),
            movement_log: MovementLog::new(),
            camera: CameraPanel::default(),
            map: MapView::default(),
            last_command: None,
            navigate_input: String::new(),
            pulse: None,
            speed: DEFAULT_SPEED,
            pulse_duration: PULSE_DURATION,
        }
    }

    /// Override the notification and pulse timings.
    pub fn with_timings(mut self, notification_ttl: Duration, pulse: Duration) -> Self {
        self.notifications = NotificationCenter::new(notification_ttl);
        self.pulse_duration = pulse;
        self
    }

    pub fn focus(&self) -> Focus {
        match self.state {
            AppState::NavigateInput => Focus::TextInput,
            _ => Focus::Panel,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.state == AppState::Quit
    }

    pub fn start_pulse(&mut self, command: MoveCommand, now: Instant) {
        self.pulse = Some(Pulse {
            command,
            started: now,
        });
    }

    pub fn is_pulsing(&self, command: MoveCommand) -> bool {
        self.pulse.is_some_and(|p| p.command == command)
    }

    /// Expire the pulse and notification. Returns true if anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.notifications.expire(now);
        if self
            .pulse
            .is_some_and(|p| now.saturating_duration_since(p.started) >= self.pulse_duration)
        {
            self.pulse = None;
            changed = true;
        }
        changed
    }

    /// Speed one step up or down, or `None` at the limit.
    pub fn stepped_speed(&self, up: bool) -> Option<u8> {
        let next = if up {
            self.speed.saturating_add(SPEED_STEP)
        } else {
            self.speed.saturating_sub(SPEED_STEP)
        };
        (next != self.speed).then_some(next)
    }

    pub fn open_navigate_prompt(&mut self) {
        self.navigate_input.clear();
        self.state = AppState::NavigateInput;
    }

    pub fn push_input(&mut self, c: char) {
        if !c.is_control() && self.navigate_input.chars().count() < MAX_TARGET_LEN {
            self.navigate_input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        self.navigate_input.pop();
    }

    /// Close the prompt and return the trimmed target.
    pub fn take_input(&mut self) -> String {
        self.state = AppState::Dashboard;
        let target = self.navigate_input.trim().to_string();
        self.navigate_input.clear();
        target
    }

    pub fn cancel_input(&mut self) {
        self.navigate_input.clear();
        self.state = AppState::Dashboard;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_follows_prompt() {
        let mut app = App::new();
        assert_eq!(app.focus(), Focus::Panel);

        app.open_navigate_prompt();
        assert_eq!(app.focus(), Focus::TextInput);

        app.cancel_input();
        assert_eq!(app.focus(), Focus::Panel);
        assert_eq!(app.state, AppState::Dashboard);
    }

    #[test]
    fn test_prompt_editing() {
        let mut app = App::new();
        app.open_navigate_prompt();
        for c in " kitchen ".chars() {
            app.push_input(c);
        }
        app.push_input('\u{7}');
        app.pop_input();
        app.push_input('!');

        assert_eq!(app.take_input(), "kitchen!");
        assert!(app.navigate_input.is_empty());
        assert_eq!(app.state, AppState::Dashboard);
    }

    #[test]
    fn test_prompt_length_cap() {
        let mut app = App::new();
        app.open_navigate_prompt();
        for _ in 0..(MAX_TARGET_LEN + 10) {
            app.push_input('x');
        }
        assert_eq!(app.navigate_input.len(), MAX_TARGET_LEN);
    }

    #[test]
    fn test_pulse_expires() {
        let mut app = App::new();
        let now = Instant::now();
        app.start_pulse(MoveCommand::Forward, now);

        assert!(app.is_pulsing(MoveCommand::Forward));
        assert!(!app.is_pulsing(MoveCommand::Stop));
        assert!(!app.tick(now + Duration::from_millis(150)));
        assert!(app.tick(now + PULSE_DURATION));
        assert!(app.pulse.is_none());
    }

    #[test]
    fn test_speed_steps_saturate() {
        let mut app = App::new();
        assert_eq!(app.stepped_speed(true), Some(175));
        assert_eq!(app.stepped_speed(false), Some(125));

        app.speed = 250;
        assert_eq!(app.stepped_speed(true), Some(255));
        app.speed = 255;
        assert_eq!(app.stepped_speed(true), None);
        app.speed = 0;
        assert_eq!(app.stepped_speed(false), None);
    }
}
