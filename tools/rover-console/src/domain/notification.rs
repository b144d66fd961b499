//! Toast notifications.

use std::time::{Duration, Instant};

use rover_telemetry::log_event;

/// How long a notification stays up unless dismissed first.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Notification severity, controlling colour and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(&self) -> char {
        match self {
            Severity::Success => '✔',
            Severity::Error => '✖',
            Severity::Warning => '⚠',
            Severity::Info => 'ℹ',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Success => "SUCCESS",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

/// A single toast.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub raised_at: Instant,
}

/// Holds at most one visible notification.
#[derive(Debug)]
pub struct NotificationCenter {
    current: Option<Notification>,
    next_id: u64,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NOTIFICATION_TTL)
    }
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: None,
            next_id: 1,
            ttl,
        }
    }

    /// Replace whatever is showing with a new notification.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        self.notify_at(message, severity, Instant::now())
    }

    pub fn notify_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> u64 {
        let message = message.into();
        match severity {
            Severity::Error => log_event!(error, "notifications", "notify", text = %message),
            Severity::Warning => log_event!(warn, "notifications", "notify", text = %message),
            Severity::Success | Severity::Info => {
                log_event!(info, "notifications", "notify", text = %message)
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.current = Some(Notification {
            id,
            message,
            severity,
            raised_at: now,
        });
        id
    }

    /// Manual close.
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.current.take()
    }

    /// Drop the current notification once its TTL has elapsed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.raised_at) >= self.ttl);
        if expired {
            self.current = None;
        }
        expired
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Fraction of the TTL still remaining, for the countdown bar.
    pub fn remaining_fraction(&self, now: Instant) -> f64 {
        match &self.current {
            Some(n) if !self.ttl.is_zero() => {
                let elapsed = now.saturating_duration_since(n.raised_at);
                1.0 - (elapsed.as_secs_f64() / self.ttl.as_secs_f64()).min(1.0)
            }
            _ => 0.0,
        }
    }
}
