//! Recorded frame feeds (JSON lines, same format as the daemon's stdin).

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use proctor_core::{FrameRecord, LandmarkSnapshot, ProctorConfig};

/// Slowest frame rate accepted for untimed recordings.
pub const MIN_FPS: f64 = 0.01;

pub struct RecordedFrame {
    /// Time since the start of the recording.
    pub offset: Duration,
    pub snapshot: Option<LandmarkSnapshot>,
}

pub struct Recording {
    pub frames: Vec<RecordedFrame>,
    /// Lines that could not be decoded and were skipped.
    pub malformed: usize,
}

pub fn open(path: &Path, fps: f64) -> Result<Recording> {
    let file =
        fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read(BufReader::new(file), fps).with_context(|| format!("failed to read {}", path.display()))
}

/// Read a recording. Frames without a timestamp are placed at
/// `index / fps` seconds.
pub fn read<R: BufRead>(reader: R, fps: f64) -> Result<Recording> {
    if !fps.is_finite() || fps < MIN_FPS {
        bail!("fps must be at least {MIN_FPS}, got {fps}");
    }

    let mut frames = Vec::new();
    let mut malformed = 0;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: FrameRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                malformed += 1;
                tracing::warn!(line = lineno + 1, error = %e, "skipping malformed frame");
                continue;
            }
        };
        let offset = match record.timestamp_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::try_from_secs_f64(frames.len() as f64 / fps)
                .with_context(|| format!("line {}: frame offset out of range", lineno + 1))?,
        };
        frames.push(RecordedFrame {
            offset,
            snapshot: record.primary_face(),
        });
    }

    Ok(Recording { frames, malformed })
}

/// Load a detector config file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<ProctorConfig> {
    let Some(path) = path else {
        return Ok(ProctorConfig::default());
    };
    ProctorConfig::load(path).context("failed to load detector config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_timestamps_and_fps_fallback() {
        let input = concat!(
            "{\"multiFaceLandmarks\": []}\n",
            "\n",
            "{\"multiFaceLandmarks\": []}\n",
            "{\"t\": 5000, \"multiFaceLandmarks\": [[{\"x\": 0.1, \"y\": 0.2}]]}\n",
        );
        let rec = read(Cursor::new(input), 10.0).unwrap();
        assert_eq!(rec.frames.len(), 3);
        assert_eq!(rec.frames[0].offset, Duration::ZERO);
        assert_eq!(rec.frames[1].offset, Duration::from_millis(100));
        assert_eq!(rec.frames[2].offset, Duration::from_secs(5));
        assert!(rec.frames[2].snapshot.is_some());
        assert_eq!(rec.malformed, 0);
    }

    #[test]
    fn test_malformed_lines_counted() {
        let input = "{\"multiFaceLandmarks\": []}\nnot json\n";
        let rec = read(Cursor::new(input), 30.0).unwrap();
        assert_eq!(rec.frames.len(), 1);
        assert_eq!(rec.malformed, 1);
    }

    #[test]
    fn test_bad_fps() {
        assert!(read(Cursor::new(""), 0.0).is_err());
        assert!(read(Cursor::new(""), f64::NAN).is_err());
    }

    #[test]
    fn test_tiny_fps_is_an_error() {
        let input = "{\"multiFaceLandmarks\": []}\n{\"multiFaceLandmarks\": []}\n";
        let err = read(Cursor::new(input), 1e-300).err().unwrap();
        assert!(err.to_string().contains("fps must be at least"));
    }

    #[test]
    fn test_slowest_fps_accepted() {
        let input = "{\"multiFaceLandmarks\": []}\n{\"multiFaceLandmarks\": []}\n";
        let rec = read(Cursor::new(input), MIN_FPS).unwrap();
        assert_eq!(rec.frames[1].offset, Duration::from_secs(100));
    }

    #[test]
    fn test_config_file_errors_carry_context() {
        let path = std::env::temp_dir().join("proctor-cli-no-such-config.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }

    #[test]
    fn test_default_config_without_path() {
        assert_eq!(load_config(None).unwrap(), ProctorConfig::default());
    }
}
