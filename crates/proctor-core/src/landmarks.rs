//! Face-mesh landmark snapshots.
//!
//! The external landmark model delivers, once per frame, an ordered list of
//! normalized 2D points (x and y in `[0, 1]` relative to the image) indexed by
//! the face-mesh anatomical numbering. Only a handful of indices are read by
//! the heuristics; the rest are carried for overlay rendering.

use serde::{Deserialize, Serialize};

/// Number of points in a face-mesh snapshot (refined meshes carry more).
pub const FACE_MESH_POINTS: usize = 468;

/// Face-mesh indices used by the heuristics.
pub mod index {
    pub const NOSE_TIP: usize = 1;
    pub const FOREHEAD: usize = 10;
    pub const UPPER_LIP: usize = 13;
    pub const LOWER_LIP: usize = 14;
    pub const LEFT_EYE_LOWER: usize = 145;
    pub const CHIN: usize = 152;
    pub const LEFT_EYE_UPPER: usize = 159;
    pub const LEFT_CHEEK: usize = 234;
    pub const RIGHT_EYE_LOWER: usize = 374;
    pub const RIGHT_EYE_UPPER: usize = 386;
    pub const RIGHT_CHEEK: usize = 454;
}

/// Indices that must be present and numeric for a face to count as visible.
pub const REQUIRED: [usize; 11] = [
    index::NOSE_TIP,
    index::FOREHEAD,
    index::CHIN,
    index::UPPER_LIP,
    index::LOWER_LIP,
    index::LEFT_EYE_UPPER,
    index::LEFT_EYE_LOWER,
    index::RIGHT_EYE_UPPER,
    index::RIGHT_EYE_LOWER,
    index::LEFT_CHEEK,
    index::RIGHT_CHEEK,
];

/// A normalized landmark coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are numbers (NaN is the only rejected value).
    pub fn is_numeric(&self) -> bool {
        !self.x.is_nan() && !self.y.is_nan()
    }

    /// Euclidean distance in normalized image space.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// All landmarks for one face in one frame.
///
/// Snapshots are immutable once built and are not retained across frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSnapshot {
    points: Vec<Point>,
}

impl LandmarkSnapshot {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn get(&self, idx: usize) -> Option<&Point> {
        self.points.get(idx)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Point>> for LandmarkSnapshot {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}
