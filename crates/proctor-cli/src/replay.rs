//! `proctor replay`: run a recorded feed through a fresh session.

use std::time::{Duration, Instant};

use anyhow::Result;
use proctor_core::absence::PresenceVerdict;
use proctor_core::{CounterSet, EventKind, Presenter, ProctorConfig, ProctorSession};
use serde::Serialize;

use crate::recording::RecordedFrame;

#[derive(Debug, Serialize)]
pub struct AlertLine {
    pub at_ms: u64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub alerts: Vec<AlertLine>,
    pub counters: CounterSet,
    pub frames: u64,
    pub processed: u64,
    /// Frames on which the absence alert was raised.
    pub absent_frames: u64,
}

/// Collects banner texts with the frame time they appeared at.
#[derive(Default)]
struct Collector {
    now_ms: u64,
    alerts: Vec<AlertLine>,
}

impl Presenter for Collector {
    fn show_alert(&mut self, message: &str) {
        // The absence alert repeats every frame; keep only its first line.
        if self.alerts.last().map(|a| a.message.as_str()) == Some(message) {
            return;
        }
        self.alerts.push(AlertLine {
            at_ms: self.now_ms,
            message: message.to_string(),
        });
    }

    fn hide_alert(&mut self) {}

    fn update_stats(&mut self, _counters: &CounterSet) {}
}

pub fn replay(config: ProctorConfig, frames: &[RecordedFrame]) -> Result<ReplayReport> {
    let mut session = ProctorSession::new(config)?;
    let origin = Instant::now();
    let mut collector = Collector::default();
    let mut absent_frames = 0;

    for frame in frames {
        collector.now_ms = duration_ms(frame.offset);
        let outcome = session.process_frame(frame.snapshot.as_ref(), origin + frame.offset);
        if outcome.presence == PresenceVerdict::Absent {
            absent_frames += 1;
        }
        outcome.present_to(&mut collector);
    }

    Ok(ReplayReport {
        alerts: collector.alerts,
        counters: *session.counters(),
        frames: session.frames_seen(),
        processed: session.frames_processed(),
        absent_frames,
    })
}

pub fn print_report(report: &ReplayReport) {
    for alert in &report.alerts {
        println!("[{:>9.3}s] {}", alert.at_ms as f64 / 1000.0, alert.message);
    }
    if !report.alerts.is_empty() {
        println!();
    }
    println!(
        "Frames: {} ({} processed, {} with face absent)",
        report.frames, report.processed, report.absent_frames
    );
    for kind in EventKind::ALL {
        println!("  {:<12} {}", kind.label(), report.counters.get(kind));
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
