// derby_core/src/selector.rs

use crate::detection::{BoundingBox, DetectionResult};
use log::debug;

// Balls do not fly. A "ball" whose top edge sits in the upper tenth of the
// frame is discarded as a false positive unless the detector is at least
// this confident about it.
const HIGH_BALL_SCORE: f64 = 0.95;
const HIGH_BALL_TOP_BOUND: f64 = 0.1;
// The home sign model trained poorly and produces many false positives, so
// low-confidence home detections are discarded outright.
const HOME_SIGN_SCORE: f64 = 0.3;

// Label suffixes the false-positive filters key on.
const BALL_SUFFIX: &str = "ball";
const HOME_SUFFIX: &str = "home";

/// Picks the detection most likely to be the nearest object of the wanted
/// label, or `None` when the frame has no usable candidate.
///
/// Matching is a case-insensitive substring test, so "redBall" matches a
/// detector that reports "RedBall" or "red_ball_v2". Candidates are ranked
/// by their largest visible extent (objects may be partially covered)
/// weighted by confidence; the first seen of equal-scoring candidates wins.
pub fn find_nearest<'a>(label: &str, result: &'a DetectionResult) -> Option<&'a BoundingBox> {
    let wanted = label.to_lowercase();
    let mut nearest: Option<&BoundingBox> = None;
    let mut nearest_size = 0.0_f64;

    for bbox in &result.boxes {
        let candidate = bbox.label.to_lowercase();
        if !candidate.contains(&wanted) {
            continue;
        }

        if candidate.contains(BALL_SUFFIX)
            && bbox.score < HIGH_BALL_SCORE
            && bbox.y < HIGH_BALL_TOP_BOUND
        {
            debug!(
                "find_nearest: dropping airborne low-confidence ball (score={:.2}, y={:.2})",
                bbox.score, bbox.y
            );
            continue;
        }

        if candidate.contains(HOME_SUFFIX) && bbox.score < HOME_SIGN_SCORE {
            debug!(
                "find_nearest: dropping low-confidence home sign (score={:.2})",
                bbox.score
            );
            continue;
        }

        let size = bbox.w.max(bbox.h) * bbox.score;
        if size > nearest_size {
            nearest_size = size;
            nearest = Some(bbox);
        }
    }

    nearest
}
