//! Blink and mouth-open channels.
//!
//! Each channel samples one frame at a time. Neither checks continuity across
//! frames: a single qualifying frame with an open gate fires.

use std::time::{Duration, Instant};

use crate::features::FeatureSet;
use crate::gate::DebounceGate;
use crate::stats::{CounterSet, EventKind};

/// Fires when both eyes are closed.
#[derive(Debug, Clone)]
pub struct BlinkChannel {
    threshold: f64,
    gate: DebounceGate,
}

impl BlinkChannel {
    pub fn new(threshold: f64, debounce: Duration) -> Self {
        Self {
            threshold,
            gate: DebounceGate::new(debounce),
        }
    }

    /// Both eyes must be below the threshold; one closed eye is not a blink.
    pub fn eyes_closed(&self, features: &FeatureSet) -> bool {
        features.left_eye_height < self.threshold && features.right_eye_height < self.threshold
    }

    pub fn observe(
        &mut self,
        features: &FeatureSet,
        now: Instant,
        counters: &mut CounterSet,
    ) -> Option<EventKind> {
        if !self.eyes_closed(features) || !self.gate.is_open(now) {
            return None;
        }
        self.gate.fire(now, Some(EventKind::Blink), counters);
        Some(EventKind::Blink)
    }

    pub fn gate(&self) -> &DebounceGate {
        &self.gate
    }

    /// Open the first debounce window at `now`.
    pub fn arm(&mut self, now: Instant) {
        self.gate.arm(now);
    }

    pub fn reset(&mut self) {
        self.gate.reset();
    }
}

/// Fires when the mouth is open.
#[derive(Debug, Clone)]
pub struct MouthChannel {
    threshold: f64,
    gate: DebounceGate,
}

impl MouthChannel {
    pub fn new(threshold: f64, debounce: Duration) -> Self {
        Self {
            threshold,
            gate: DebounceGate::new(debounce),
        }
    }

    pub fn mouth_open(&self, features: &FeatureSet) -> bool {
        features.mouth_height > self.threshold
    }

    pub fn observe(
        &mut self,
        features: &FeatureSet,
        now: Instant,
        counters: &mut CounterSet,
    ) -> Option<EventKind> {
        if !self.mouth_open(features) || !self.gate.is_open(now) {
            return None;
        }
        self.gate.fire(now, Some(EventKind::MouthOpen), counters);
        Some(EventKind::MouthOpen)
    }

    pub fn gate(&self) -> &DebounceGate {
        &self.gate
    }

    /// Open the first debounce window at `now`.
    pub fn arm(&mut self, now: Instant) {
        self.gate.arm(now);
    }

    pub fn reset(&mut self) {
        self.gate.reset();
    }
}
