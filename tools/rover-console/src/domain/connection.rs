//! Connection indicator state.

/// Mirrors the last connection flag reported by the robot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionView {
    connected: bool,
}

impl ConnectionView {
    pub fn set_connection_state(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Status text next to the indicator dot.
    pub fn status_text(&self) -> &'static str {
        if self.connected {
            "Connected"
        } else {
            "Disconnected"
        }
    }

    /// The indicator pulses while disconnected to draw attention.
    pub fn pulsing(&self) -> bool {
        !self.connected
    }

    /// The connect control is only usable while disconnected.
    pub fn connect_enabled(&self) -> bool {
        !self.connected
    }

    pub fn connect_label(&self) -> &'static str {
        if self.connected {
            "Connected"
        } else {
            "Connect Robot"
        }
    }
}
