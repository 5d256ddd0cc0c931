//! Head-pose channel.
//!
//! The pose is read from nose-tip distance asymmetry: turning the head right
//! brings the nose towards the right cheek in image space, tilting it up
//! brings it towards the forehead. Classification walks [`RULES`] in order and
//! takes the first match, so horizontal turns always win over vertical tilts.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::Thresholds;
use crate::features::FeatureSet;
use crate::gate::DebounceGate;
use crate::stats::{CounterSet, EventKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadState {
    #[default]
    Stable,
    Left,
    Right,
    Up,
    Down,
}

impl HeadState {
    /// Counted event for entering this state. Returning to stable counts nothing.
    pub fn event(self) -> Option<EventKind> {
        match self {
            HeadState::Stable => None,
            HeadState::Left => Some(EventKind::HeadLeft),
            HeadState::Right => Some(EventKind::HeadRight),
            HeadState::Up => Some(EventKind::HeadUp),
            HeadState::Down => Some(EventKind::HeadDown),
        }
    }
}

/// One entry of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct PoseRule {
    pub state: HeadState,
    pub matches: fn(&FeatureSet, &Thresholds) -> bool,
}

/// Ordered classification table; anything unmatched is [`HeadState::Stable`].
pub const RULES: [PoseRule; 4] = [
    PoseRule {
        state: HeadState::Right,
        matches: |f, t| f.dist_to_right_cheek < f.dist_to_left_cheek - t.horizontal_offset,
    },
    PoseRule {
        state: HeadState::Left,
        matches: |f, t| f.dist_to_left_cheek < f.dist_to_right_cheek - t.horizontal_offset,
    },
    PoseRule {
        state: HeadState::Up,
        matches: |f, t| f.dist_to_forehead < f.dist_to_chin - t.vertical_offset,
    },
    PoseRule {
        state: HeadState::Down,
        matches: |f, t| f.dist_to_chin < f.dist_to_forehead - t.vertical_offset,
    },
];

pub fn classify(features: &FeatureSet, thresholds: &Thresholds) -> HeadState {
    RULES
        .iter()
        .find(|rule| (rule.matches)(features, thresholds))
        .map_or(HeadState::Stable, |rule| rule.state)
}

/// Outcome of one head-pose observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadObservation {
    /// Pose classified for this frame, whether or not it was committed.
    pub classified: HeadState,
    /// Set when the stored pose changed this frame.
    pub transition: Option<HeadState>,
}

impl HeadObservation {
    pub fn event(&self) -> Option<EventKind> {
        self.transition.and_then(HeadState::event)
    }
}

#[derive(Debug, Clone)]
pub struct HeadPoseChannel {
    thresholds: Thresholds,
    current: HeadState,
    gate: DebounceGate,
}

impl HeadPoseChannel {
    pub fn new(thresholds: Thresholds, debounce: Duration) -> Self {
        Self {
            thresholds,
            current: HeadState::Stable,
            gate: DebounceGate::new(debounce),
        }
    }

    pub fn current(&self) -> HeadState {
        self.current
    }

    pub fn gate(&self) -> &DebounceGate {
        &self.gate
    }

    /// Open the first debounce window at `now`.
    pub fn arm(&mut self, now: Instant) {
        self.gate.arm(now);
    }

    /// Classify the frame and commit a transition when the pose differs from
    /// the stored one and the gate is open.
    pub fn observe(
        &mut self,
        features: &FeatureSet,
        now: Instant,
        counters: &mut CounterSet,
    ) -> HeadObservation {
        let classified = classify(features, &self.thresholds);
        if classified == self.current || !self.gate.is_open(now) {
            return HeadObservation {
                classified,
                transition: None,
            };
        }

        self.gate.fire(now, classified.event(), counters);
        tracing::trace!(from = ?self.current, to = ?classified, "head pose transition");
        self.current = classified;

        HeadObservation {
            classified,
            transition: Some(classified),
        }
    }

    pub fn reset(&mut self) {
        self.current = HeadState::Stable;
        self.gate.reset();
    }
}
