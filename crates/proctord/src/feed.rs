//! Frame feed decoding: JSON-lines records from the landmark source.

use std::time::{Duration, Instant};

use proctor_core::FrameRecord;

use crate::tracker::Frame;

/// Decode one feed line. Blank lines yield `None`.
pub fn decode_line(line: &str) -> Option<Result<FrameRecord, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Maps feed timestamps onto the daemon's monotonic clock.
pub struct FrameClock {
    origin: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Frame time: the feed's own timestamp when given, arrival time otherwise.
    pub fn at(&self, timestamp_ms: Option<u64>) -> Instant {
        match timestamp_ms {
            Some(ms) => self.origin + Duration::from_millis(ms),
            None => Instant::now(),
        }
    }

    pub fn frame(&self, record: &FrameRecord) -> Frame {
        Frame {
            snapshot: record.primary_face(),
            at: self.at(record.timestamp_ms),
        }
    }
}
