//! Face-absence timer.
//!
//! A single dropped frame must not raise an alert, so absence is only
//! confirmed once the face has been missing for longer than the grace period.
//! Once confirmed, every further missing frame re-raises the alert.

use std::time::{Duration, Instant};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceState {
    Present,
    AbsentPending { since: Instant },
    AbsentConfirmed,
}

/// What the frame loop should do with the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceVerdict {
    /// Face usable; run the behaviour channels.
    Present,
    /// Face unusable but still within the grace period; skip the frame quietly.
    Pending,
    /// Face gone for longer than the grace period; raise the absence alert
    /// and skip the frame.
    Absent,
}

#[derive(Debug, Clone)]
pub struct AbsenceTimer {
    grace: Duration,
    state: PresenceState,
}

impl AbsenceTimer {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            state: PresenceState::Present,
        }
    }

    pub fn state(&self) -> PresenceState {
        self.state
    }

    pub fn observe(&mut self, visible: bool, now: Instant) -> PresenceVerdict {
        if visible {
            if self.state != PresenceState::Present {
                tracing::debug!("face back in frame");
            }
            self.state = PresenceState::Present;
            return PresenceVerdict::Present;
        }

        match self.state {
            PresenceState::Present => {
                self.state = PresenceState::AbsentPending { since: now };
                PresenceVerdict::Pending
            }
            PresenceState::AbsentPending { since } => {
                let missing_for = now.saturating_duration_since(since);
                if missing_for > self.grace {
                    tracing::warn!(
                        missing_ms = missing_for.as_millis() as u64,
                        "face absence confirmed"
                    );
                    self.state = PresenceState::AbsentConfirmed;
                    PresenceVerdict::Absent
                } else {
                    PresenceVerdict::Pending
                }
            }
            PresenceState::AbsentConfirmed => PresenceVerdict::Absent,
        }
    }

    pub fn reset(&mut self) {
        self.state = PresenceState::Present;
    }
}
