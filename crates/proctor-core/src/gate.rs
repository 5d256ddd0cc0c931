use std::time::{Duration, Instant};

use crate::stats::{CounterSet, EventKind};

/// Per-channel debounce state.
///
/// A gate is open when strictly more than `interval` has passed since it last
/// fired or was armed. An unarmed gate that has never fired is open. Firing
/// stamps the time and bumps the counter in one call, so neither can change
/// without the other.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl DebounceGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_fired(&self) -> Option<Instant> {
        self.last_fired
    }

    pub fn is_open(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            // A timestamp earlier than the last firing reads as zero elapsed.
            Some(last) => now.saturating_duration_since(last) > self.interval,
        }
    }

    /// Start the first window at `now`, as if the gate had fired then without
    /// counting anything. Has no effect once the gate holds a timestamp.
    pub fn arm(&mut self, now: Instant) {
        if self.last_fired.is_none() {
            self.last_fired = Some(now);
        }
    }

    /// Stamp `now` and record `event`, if any. `None` still restarts the window.
    pub fn fire(&mut self, now: Instant, event: Option<EventKind>, counters: &mut CounterSet) {
        self.last_fired = Some(now);
        if let Some(kind) = event {
            counters.record(kind);
        }
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
