use std::path::PathBuf;

use proctor_core::{ConfigLoadError, ProctorConfig};

/// Daemon configuration, loaded from environment variables.
pub struct Config {
    /// Detector thresholds and timings (from `PROCTOR_CONFIG`, else defaults).
    pub detector: ProctorConfig,
    /// TOML file the detector config was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Frames buffered between the feed and the tracker. Frames arriving while
    /// the buffer is full are dropped.
    pub frame_queue: usize,
    /// Whether to emit landmark overlay points for every processed frame.
    pub emit_overlay: bool,
    /// Render surface the overlay is scaled to (default: capture size).
    pub surface_width: f64,
    pub surface_height: f64,
}

impl Config {
    /// Load configuration from `PROCTOR_*` environment variables with defaults.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config_path = std::env::var("PROCTOR_CONFIG").ok().map(PathBuf::from);
        let detector = match &config_path {
            Some(path) => ProctorConfig::load(path)?,
            None => ProctorConfig::default(),
        };

        let source = detector.source;
        Ok(Self {
            frame_queue: env_usize("PROCTOR_FRAME_QUEUE", 2).max(1),
            emit_overlay: std::env::var("PROCTOR_EMIT_OVERLAY")
                .map(|v| v != "0")
                .unwrap_or(false),
            surface_width: env_f64("PROCTOR_SURFACE_WIDTH", f64::from(source.capture_width)),
            surface_height: env_f64("PROCTOR_SURFACE_HEIGHT", f64::from(source.capture_height)),
            detector,
            config_path,
        })
    }

    /// Overlay surface size, when overlays are enabled.
    pub fn overlay_surface(&self) -> Option<(f64, f64)> {
        self.emit_overlay
            .then_some((self.surface_width, self.surface_height))
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v: &f64| v.is_finite() && *v > 0.0)
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
