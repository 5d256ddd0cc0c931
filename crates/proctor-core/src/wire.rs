//! Frame feed records.
//!
//! A feed is one JSON object per line, shaped like the face-mesh result
//! callback: `{"t": 1234, "multiFaceLandmarks": [[{"x": 0.51, "y": 0.42}, ...]]}`.
//! `t` is milliseconds since the start of the feed and may be omitted. A null
//! coordinate reads as NaN so the visibility check rejects it; extra fields
//! such as `z` are ignored.

use serde::{Deserialize, Serialize};

use crate::landmarks::{LandmarkSnapshot, Point};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WirePoint {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl From<WirePoint> for Point {
    fn from(p: WirePoint) -> Self {
        Point::new(p.x.unwrap_or(f64::NAN), p.y.unwrap_or(f64::NAN))
    }
}

impl From<Point> for WirePoint {
    fn from(p: Point) -> Self {
        let coord = |v: f64| (!v.is_nan()).then_some(v);
        WirePoint {
            x: coord(p.x),
            y: coord(p.y),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default, rename = "t", skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    #[serde(default, rename = "multiFaceLandmarks")]
    pub multi_face_landmarks: Vec<Vec<WirePoint>>,
}

impl FrameRecord {
    /// The first face of the frame; only one face is tracked.
    pub fn primary_face(&self) -> Option<LandmarkSnapshot> {
        self.multi_face_landmarks
            .first()
            .map(|points| points.iter().copied().map(Point::from).collect::<Vec<_>>().into())
    }

    pub fn from_snapshot(timestamp_ms: Option<u64>, snapshot: &LandmarkSnapshot) -> Self {
        Self {
            timestamp_ms,
            multi_face_landmarks: vec![snapshot.points().iter().copied().map(WirePoint::from).collect()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_result_shape() {
        let line = r#"{"t": 40, "multiFaceLandmarks": [[{"x": 0.5, "y": 0.25, "z": -0.01}, {"x": 0.1, "y": 0.2}]]}"#;
        let record: FrameRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.timestamp_ms, Some(40));
        let face = record.primary_face().unwrap();
        assert_eq!(face.len(), 2);
        assert_eq!(face.get(0), Some(&Point::new(0.5, 0.25)));
    }

    #[test]
    fn test_no_face() {
        let record: FrameRecord = serde_json::from_str(r#"{"multiFaceLandmarks": []}"#).unwrap();
        assert_eq!(record.timestamp_ms, None);
        assert!(record.primary_face().is_none());

        let bare: FrameRecord = serde_json::from_str("{}").unwrap();
        assert!(bare.primary_face().is_none());
    }

    #[test]
    fn test_null_coordinate_is_nan() {
        let record: FrameRecord =
            serde_json::from_str(r#"{"multiFaceLandmarks": [[{"x": null, "y": 0.3}, {"y": 0.3}]]}"#)
                .unwrap();
        let face = record.primary_face().unwrap();
        assert!(face.points().iter().all(|p| p.x.is_nan() && !p.is_numeric()));
    }

    #[test]
    fn test_only_first_face_used() {
        let record: FrameRecord = serde_json::from_str(
            r#"{"multiFaceLandmarks": [[{"x": 0.1, "y": 0.1}], [{"x": 0.9, "y": 0.9}, {"x": 0.9, "y": 0.9}]]}"#,
        )
        .unwrap();
        assert_eq!(record.primary_face().unwrap().len(), 1);
    }

    #[test]
    fn test_nan_written_as_null() {
        let snap = LandmarkSnapshot::new(vec![Point::new(f64::NAN, 0.5)]);
        let json = serde_json::to_string(&FrameRecord::from_snapshot(Some(7), &snap)).unwrap();
        assert_eq!(json, r#"{"t":7,"multiFaceLandmarks":[[{"x":null,"y":0.5}]]}"#);
    }
}
