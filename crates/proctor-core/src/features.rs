//! Scalar features derived from a visible face.

use serde::Serialize;

use crate::visibility::FacePoints;

/// Per-frame geometric features, all in normalized image units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSet {
    /// Vertical gap between the left upper and lower eyelid.
    pub left_eye_height: f64,
    /// Vertical gap between the right upper and lower eyelid.
    pub right_eye_height: f64,
    /// Vertical gap between the upper and lower lip.
    pub mouth_height: f64,
    pub dist_to_left_cheek: f64,
    pub dist_to_right_cheek: f64,
    pub dist_to_forehead: f64,
    pub dist_to_chin: f64,
}

impl FeatureSet {
    /// Compute features for one frame. Distances are measured from the nose tip.
    pub fn extract(face: &FacePoints) -> Self {
        let nose = face.nose_tip;
        Self {
            left_eye_height: (face.left_eye_upper.y - face.left_eye_lower.y).abs(),
            right_eye_height: (face.right_eye_upper.y - face.right_eye_lower.y).abs(),
            mouth_height: (face.upper_lip.y - face.lower_lip.y).abs(),
            dist_to_left_cheek: nose.distance(&face.left_cheek),
            dist_to_right_cheek: nose.distance(&face.right_cheek),
            dist_to_forehead: nose.distance(&face.forehead),
            dist_to_chin: nose.distance(&face.chin),
        }
    }
}
