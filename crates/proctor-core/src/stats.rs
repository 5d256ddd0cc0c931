//! Behaviour event kinds and the running counters shown to the proctor.

use serde::{Deserialize, Serialize};

/// A counted behaviour event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Blink,
    MouthOpen,
    HeadLeft,
    HeadRight,
    HeadUp,
    HeadDown,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Blink,
        EventKind::MouthOpen,
        EventKind::HeadLeft,
        EventKind::HeadRight,
        EventKind::HeadUp,
        EventKind::HeadDown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventKind::Blink => "blink",
            EventKind::MouthOpen => "mouth_open",
            EventKind::HeadLeft => "head_left",
            EventKind::HeadRight => "head_right",
            EventKind::HeadUp => "head_up",
            EventKind::HeadDown => "head_down",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-event counters for one session. Counts never decrease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSet {
    pub blink: u64,
    pub mouth_open: u64,
    pub head_left: u64,
    pub head_right: u64,
    pub head_up: u64,
    pub head_down: u64,
}

impl CounterSet {
    pub fn get(&self, kind: EventKind) -> u64 {
        match kind {
            EventKind::Blink => self.blink,
            EventKind::MouthOpen => self.mouth_open,
            EventKind::HeadLeft => self.head_left,
            EventKind::HeadRight => self.head_right,
            EventKind::HeadUp => self.head_up,
            EventKind::HeadDown => self.head_down,
        }
    }

    pub(crate) fn record(&mut self, kind: EventKind) {
        let slot = match kind {
            EventKind::Blink => &mut self.blink,
            EventKind::MouthOpen => &mut self.mouth_open,
            EventKind::HeadLeft => &mut self.head_left,
            EventKind::HeadRight => &mut self.head_right,
            EventKind::HeadUp => &mut self.head_up,
            EventKind::HeadDown => &mut self.head_down,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        EventKind::ALL.iter().map(|&k| self.get(k)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_touches_only_its_counter() {
        for kind in EventKind::ALL {
            let mut counters = CounterSet::default();
            counters.record(kind);
            for other in EventKind::ALL {
                assert_eq!(counters.get(other), u64::from(other == kind), "{kind} vs {other}");
            }
        }
    }

    #[test]
    fn test_total() {
        let mut counters = CounterSet::default();
        counters.record(EventKind::Blink);
        counters.record(EventKind::Blink);
        counters.record(EventKind::HeadDown);
        assert_eq!(counters.total(), 3);
    }

    #[test]
    fn test_kind_serializes_as_label() {
        for kind in EventKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.label()));
        }
    }
}
