//! Proctor core: turns a stream of face-mesh landmark snapshots into debounced
//! behaviour alerts.
//!
//! Landmark detection itself happens elsewhere; this crate starts from the
//! points. Per frame the pipeline is:
//!
//! - [`visibility`]: are the eleven landmarks the heuristics need present?
//! - [`absence`]: has the face been gone long enough to raise an alert?
//! - [`features`]: eye and mouth apertures, nose-to-anchor distances.
//! - [`channels`] and [`head_pose`]: per-behaviour detectors, each behind its
//!   own [`gate::DebounceGate`].
//! - [`alert`]: the single banner slot shared by every channel.
//!
//! [`session::ProctorSession`] wires these together and is the only owner of
//! mutable state. Everything is single-threaded and frame-driven; time is
//! whatever `Instant` the caller passes in.

pub mod absence;
pub mod alert;
pub mod channels;
pub mod config;
pub mod features;
pub mod gate;
pub mod head_pose;
pub mod landmarks;
pub mod overlay;
pub mod present;
pub mod session;
pub mod stats;
pub mod visibility;
pub mod wire;

pub use config::{ConfigError, ConfigLoadError, ProctorConfig};
pub use features::FeatureSet;
pub use head_pose::HeadState;
pub use landmarks::{LandmarkSnapshot, Point};
pub use present::Presenter;
pub use session::{FrameOutcome, ProctorSession};
pub use stats::{CounterSet, EventKind};
pub use visibility::is_visible;
pub use wire::FrameRecord;
