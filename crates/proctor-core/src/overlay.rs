//! Landmark overlay for the presentation layer.
//!
//! Pure function of one snapshot; nothing here keeps state between frames.

use serde::Serialize;

use crate::landmarks::{index, LandmarkSnapshot};

/// Colour group of an overlay point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointGroup {
    Eyes,
    Mouth,
    NoseCheeks,
    ForeheadChin,
    Other,
}

impl PointGroup {
    pub fn color(self) -> &'static str {
        match self {
            PointGroup::Eyes => "green",
            PointGroup::Mouth => "red",
            PointGroup::NoseCheeks => "yellow",
            PointGroup::ForeheadChin => "orange",
            PointGroup::Other => "blue",
        }
    }

    pub fn radius(self) -> f64 {
        match self {
            PointGroup::Other => 2.0,
            _ => 3.0,
        }
    }
}

/// Highlighted groups in draw order.
pub const HIGHLIGHTS: [(PointGroup, &[usize]); 4] = [
    (
        PointGroup::Eyes,
        &[
            index::LEFT_EYE_UPPER,
            index::LEFT_EYE_LOWER,
            index::RIGHT_EYE_UPPER,
            index::RIGHT_EYE_LOWER,
        ],
    ),
    (PointGroup::Mouth, &[index::UPPER_LIP, index::LOWER_LIP]),
    (
        PointGroup::NoseCheeks,
        &[index::NOSE_TIP, index::LEFT_CHEEK, index::RIGHT_CHEEK],
    ),
    (PointGroup::ForeheadChin, &[index::FOREHEAD, index::CHIN]),
];

/// A point ready to draw, in render-surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub group: PointGroup,
}

fn group_of(idx: usize) -> PointGroup {
    HIGHLIGHTS
        .iter()
        .find(|(_, members)| members.contains(&idx))
        .map_or(PointGroup::Other, |(group, _)| *group)
}

/// Scale every landmark onto a `width` x `height` surface.
///
/// Ungrouped points come first and highlighted groups last, so the highlights
/// draw on top. Non-numeric points are skipped.
pub fn overlay(snapshot: &LandmarkSnapshot, width: f64, height: f64) -> Vec<OverlayPoint> {
    let scale = |idx: usize, group: PointGroup| {
        snapshot
            .get(idx)
            .filter(|p| p.is_numeric())
            .map(|p| OverlayPoint {
                x: p.x * width,
                y: p.y * height,
                radius: group.radius(),
                group,
            })
    };

    let others = (0..snapshot.len())
        .filter(|&idx| group_of(idx) == PointGroup::Other)
        .filter_map(|idx| scale(idx, PointGroup::Other));

    let highlighted = HIGHLIGHTS
        .iter()
        .flat_map(|(group, members)| members.iter().map(move |&idx| (idx, *group)))
        .filter_map(|(idx, group)| scale(idx, group));

    others.chain(highlighted).collect()
}
