//! Per-endpoint in-flight request tracking.
//!
//! Every background request takes a [`Ticket`]. A response is applied only if
//! its ticket is still the latest one issued for that endpoint.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Status,
    Map,
    SystemInfo,
    MovementLog,
    Snapshot,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Status => "status",
            Endpoint::Map => "map",
            Endpoint::SystemInfo => "system_info",
            Endpoint::MovementLog => "movement_log",
            Endpoint::Snapshot => "snapshot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub endpoint: Endpoint,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    latest: u64,
    outstanding: bool,
}

#[derive(Debug, Default)]
pub struct InFlightTracker {
    slots: HashMap<Endpoint, Slot>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket unless a request is already outstanding.
    pub fn try_begin(&mut self, endpoint: Endpoint) -> Option<Ticket> {
        if self.is_in_flight(endpoint) {
            return None;
        }
        Some(self.begin_superseding(endpoint))
    }

    /// Issue a ticket, invalidating any outstanding one.
    pub fn begin_superseding(&mut self, endpoint: Endpoint) -> Ticket {
        let slot = self.slots.entry(endpoint).or_default();
        slot.latest += 1;
        slot.outstanding = true;
        Ticket {
            endpoint,
            generation: slot.latest,
        }
    }

    /// Settle a ticket. Returns false for a stale one, whose response must be dropped.
    pub fn complete(&mut self, ticket: Ticket) -> bool {
        match self.slots.get_mut(&ticket.endpoint) {
            Some(slot) if slot.latest == ticket.generation => {
                slot.outstanding = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_in_flight(&self, endpoint: Endpoint) -> bool {
        self.slots.get(&endpoint).is_some_and(|s| s.outstanding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_begin_skips_while_outstanding() {
        let mut tracker = InFlightTracker::new();

        let ticket = tracker.try_begin(Endpoint::Status).unwrap();
        assert!(tracker.is_in_flight(Endpoint::Status));
        assert!(tracker.try_begin(Endpoint::Status).is_none());

        assert!(tracker.complete(ticket));
        assert!(!tracker.is_in_flight(Endpoint::Status));
        assert!(tracker.try_begin(Endpoint::Status).is_some());
    }

    #[test]
    fn test_endpoints_are_independent() {
        let mut tracker = InFlightTracker::new();
        assert!(tracker.try_begin(Endpoint::Status).is_some());
        assert!(tracker.try_begin(Endpoint::Map).is_some());
        assert!(!tracker.is_in_flight(Endpoint::Snapshot));
    }

    #[test]
    fn test_superseded_ticket_is_stale() {
        let mut tracker = InFlightTracker::new();

        let first = tracker.begin_superseding(Endpoint::MovementLog);
        let second = tracker.begin_superseding(Endpoint::MovementLog);
        assert_ne!(first, second);

        assert!(!tracker.complete(first));
        assert!(tracker.is_in_flight(Endpoint::MovementLog));
        assert!(tracker.complete(second));
        assert!(!tracker.is_in_flight(Endpoint::MovementLog));
    }

    #[test]
    fn test_complete_twice_and_unknown() {
        let mut tracker = InFlightTracker::new();
        let ticket = Ticket {
            endpoint: Endpoint::Map,
            generation: 1,
        };
        assert!(!tracker.complete(ticket));

        let ticket = tracker.begin_superseding(Endpoint::Map);
        assert!(tracker.complete(ticket));
        // A repeated completion of the latest ticket is harmless.
        assert!(tracker.complete(ticket));
    }
}
