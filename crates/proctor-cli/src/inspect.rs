//! `proctor inspect`: per-frame view of what the heuristics see, for tuning
//! thresholds against a recording.

use std::fmt::Write as _;
use std::time::Instant;

use anyhow::Result;
use proctor_core::head_pose::classify;
use proctor_core::{visibility, FeatureSet, ProctorConfig, ProctorSession};

use crate::recording::RecordedFrame;

pub fn inspect(config: ProctorConfig, frames: &[RecordedFrame]) -> Result<Vec<String>> {
    let thresholds = config.thresholds;
    let mut session = ProctorSession::new(config)?;
    let origin = Instant::now();
    let mut rows = Vec::with_capacity(frames.len() + 1);

    rows.push(format!(
        "{:>9}  {:<8}  {:>6} {:>6} {:>6}  {:>6} {:>6} {:>6} {:>6}  {:<7}  events",
        "t", "presence", "eye_l", "eye_r", "mouth", "cheekL", "cheekR", "fhead", "chin", "pose"
    ));

    for frame in frames {
        let outcome = session.process_frame(frame.snapshot.as_ref(), origin + frame.offset);
        let secs = frame.offset.as_secs_f64();
        let presence = format!("{:?}", outcome.presence).to_lowercase();

        let mut row = format!("{secs:>8.3}s  {presence:<8}  ");
        // Any usable face gets its features, including frames the session skipped.
        match visibility::locate(frame.snapshot.as_ref()) {
            Ok(face) => {
                let f = FeatureSet::extract(&face);
                let pose = format!("{:?}", classify(&f, &thresholds)).to_lowercase();
                let _ = write!(
                    row,
                    "{:>6.3} {:>6.3} {:>6.3}  {:>6.3} {:>6.3} {:>6.3} {:>6.3}  {:<7}",
                    f.left_eye_height,
                    f.right_eye_height,
                    f.mouth_height,
                    f.dist_to_left_cheek,
                    f.dist_to_right_cheek,
                    f.dist_to_forehead,
                    f.dist_to_chin,
                    pose
                );
            }
            Err(reason) => {
                let _ = write!(row, "{:<55}", reason.to_string());
            }
        }

        let events: Vec<&str> = outcome.events.iter().map(|e| e.label()).collect();
        if !events.is_empty() {
            let _ = write!(row, "  {}", events.join(","));
        }
        rows.push(row.trim_end().to_string());
    }

    Ok(rows)
}
