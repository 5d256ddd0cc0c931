//! Face visibility check.
//!
//! A face is usable for a frame only when every required landmark exists and
//! carries numeric coordinates. An unusable frame is not an error: the caller
//! treats it as "no face this frame" and lets the absence timer decide.

use thiserror::Error;

use crate::landmarks::{index, LandmarkSnapshot, Point, REQUIRED};

/// Why a snapshot could not be used.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occlusion {
    #[error("no face in frame")]
    NoFace,
    #[error("required landmark {0} missing")]
    Missing(usize),
    #[error("required landmark {0} is not numeric")]
    NonNumeric(usize),
}

/// The required landmarks of a visible face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePoints {
    pub nose_tip: Point,
    pub forehead: Point,
    pub chin: Point,
    pub upper_lip: Point,
    pub lower_lip: Point,
    pub left_eye_upper: Point,
    pub left_eye_lower: Point,
    pub right_eye_upper: Point,
    pub right_eye_lower: Point,
    pub left_cheek: Point,
    pub right_cheek: Point,
}

/// Pick out the required landmarks, or report the first reason the snapshot
/// is unusable (checked in [`REQUIRED`] order).
pub fn locate(snapshot: Option<&LandmarkSnapshot>) -> Result<FacePoints, Occlusion> {
    let snapshot = match snapshot {
        Some(s) if !s.is_empty() => s,
        _ => return Err(Occlusion::NoFace),
    };

    for &idx in &REQUIRED {
        match snapshot.get(idx) {
            None => return Err(Occlusion::Missing(idx)),
            Some(p) if !p.is_numeric() => return Err(Occlusion::NonNumeric(idx)),
            Some(_) => {}
        }
    }

    // Every required index was checked above.
    let at = |idx: usize| snapshot.points()[idx];

    Ok(FacePoints {
        nose_tip: at(index::NOSE_TIP),
        forehead: at(index::FOREHEAD),
        chin: at(index::CHIN),
        upper_lip: at(index::UPPER_LIP),
        lower_lip: at(index::LOWER_LIP),
        left_eye_upper: at(index::LEFT_EYE_UPPER),
        left_eye_lower: at(index::LEFT_EYE_LOWER),
        right_eye_upper: at(index::RIGHT_EYE_UPPER),
        right_eye_lower: at(index::RIGHT_EYE_LOWER),
        left_cheek: at(index::LEFT_CHEEK),
        right_cheek: at(index::RIGHT_CHEEK),
    })
}

/// Whether the face in `snapshot` is usably present.
pub fn is_visible(snapshot: Option<&LandmarkSnapshot>) -> bool {
    locate(snapshot).is_ok()
}
