//! Detector thresholds, timing windows and alert texts.
//!
//! Defaults are the empirically tuned constants the heuristics were built
//! around. Every field may be overridden from a config file; missing fields
//! keep their default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::EventKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("threshold {name} must be a finite non-negative number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("alert_display_ms must be greater than zero")]
    ZeroAlertDuration,
    #[error("source option {name} out of range: {detail}")]
    InvalidSourceOption { name: &'static str, detail: String },
}

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid detector config: {0}")]
    Invalid(#[from] ConfigError),
}

/// Geometric thresholds, in normalized image units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Both eye heights below this count as closed eyes.
    pub eye_aperture: f64,
    /// Mouth height above this counts as an open mouth.
    pub mouth_aperture: f64,
    /// Minimum cheek-distance asymmetry for a left/right turn.
    pub horizontal_offset: f64,
    /// Minimum forehead/chin asymmetry for an up/down tilt.
    pub vertical_offset: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            eye_aperture: 0.015,
            mouth_aperture: 0.03,
            horizontal_offset: 0.05,
            vertical_offset: 0.05,
        }
    }
}

/// Debounce windows and durations, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub blink_debounce_ms: u64,
    pub mouth_debounce_ms: u64,
    pub head_debounce_ms: u64,
    /// How long the face may be missing before absence is confirmed.
    pub absence_grace_ms: u64,
    /// How long a temporary alert stays on screen.
    pub alert_display_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            blink_debounce_ms: 1000,
            mouth_debounce_ms: 3000,
            head_debounce_ms: 2000,
            absence_grace_ms: 2000,
            alert_display_ms: 3000,
        }
    }
}

impl Timings {
    pub fn blink_debounce(&self) -> Duration {
        Duration::from_millis(self.blink_debounce_ms)
    }

    pub fn mouth_debounce(&self) -> Duration {
        Duration::from_millis(self.mouth_debounce_ms)
    }

    pub fn head_debounce(&self) -> Duration {
        Duration::from_millis(self.head_debounce_ms)
    }

    pub fn absence_grace(&self) -> Duration {
        Duration::from_millis(self.absence_grace_ms)
    }

    pub fn alert_display(&self) -> Duration {
        Duration::from_millis(self.alert_display_ms)
    }
}

/// Alert banner texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub eyes_closed: String,
    pub mouth_open: String,
    pub head_left: String,
    pub head_right: String,
    pub head_up: String,
    pub head_down: String,
    pub face_absent: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            eyes_closed: "Candidate has had their eyes closed too long. Asleep?".to_string(),
            mouth_open: "Candidate appears to be talking during the exam.".to_string(),
            head_left: "Candidate turned their head to the left.".to_string(),
            head_right: "Candidate turned their head to the right.".to_string(),
            head_up: "Candidate tilted their head up.".to_string(),
            head_down: "Candidate tilted their head down.".to_string(),
            face_absent: "Candidate is not in front of the camera!".to_string(),
        }
    }
}

impl Messages {
    pub fn for_event(&self, kind: EventKind) -> &str {
        match kind {
            EventKind::Blink => &self.eyes_closed,
            EventKind::MouthOpen => &self.mouth_open,
            EventKind::HeadLeft => &self.head_left,
            EventKind::HeadRight => &self.head_right,
            EventKind::HeadUp => &self.head_up,
            EventKind::HeadDown => &self.head_down,
        }
    }
}

/// Options handed to the external landmark source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    pub max_num_faces: u32,
    pub refine_landmarks: bool,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
    pub capture_width: u32,
    pub capture_height: u32,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            max_num_faces: 1,
            refine_landmarks: true,
            min_detection_confidence: 0.9,
            min_tracking_confidence: 0.9,
            capture_width: 640,
            capture_height: 480,
        }
    }
}

/// Full detector configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProctorConfig {
    pub thresholds: Thresholds,
    pub timings: Timings,
    pub messages: Messages,
    pub source: SourceOptions,
}

impl ProctorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        for (name, value) in [
            ("eye_aperture", t.eye_aperture),
            ("mouth_aperture", t.mouth_aperture),
            ("horizontal_offset", t.horizontal_offset),
            ("vertical_offset", t.vertical_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        if self.timings.alert_display_ms == 0 {
            return Err(ConfigError::ZeroAlertDuration);
        }

        let s = &self.source;
        if s.max_num_faces == 0 {
            return Err(ConfigError::InvalidSourceOption {
                name: "max_num_faces",
                detail: "at least one face must be tracked".to_string(),
            });
        }
        for (name, value) in [
            ("min_detection_confidence", s.min_detection_confidence),
            ("min_tracking_confidence", s.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSourceOption {
                    name,
                    detail: format!("{value} not in [0, 1]"),
                });
            }
        }

        Ok(())
    }

    /// Read and validate a TOML config file. Missing fields keep their default.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_toml(&text).map_err(|e| match e {
            ParseError::Toml(source) => ConfigLoadError::Parse {
                path: path.to_path_buf(),
                source,
            },
            ParseError::Invalid(e) => ConfigLoadError::Invalid(e),
        })
    }
}

#[derive(Debug)]
enum ParseError {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}

fn parse_toml(text: &str) -> Result<ProctorConfig, ParseError> {
    let config: ProctorConfig = toml::from_str(text).map_err(ParseError::Toml)?;
    config.validate().map_err(ParseError::Invalid)?;
    Ok(config)
}
