// derby_core/src/detection.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outline of one object found by the detection service.
///
/// Coordinates are normalized to [0, 1] fractions of the frame, with the
/// origin in the top-left corner. `y` is the top edge of the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Label of the object, e.g. "redBall", "blueHome", "obstacle".
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Detection confidence, between 0 and 1.
    pub score: f64,
}

impl BoundingBox {
    pub fn new(label: impl Into<String>, x: f64, y: f64, w: f64, h: f64, score: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            w,
            h,
            score,
        }
    }

    /// Horizontal center of the box.
    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    /// Right edge of the box.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge of the box.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// Everything the detection service found in one camera frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub boxes: Vec<BoundingBox>,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_box(&mut self, bbox: BoundingBox) {
        self.boxes.push(bbox);
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Why a frame could not be classified.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("invalid image reference '{0}'")]
    BadImageReference(String),
    #[error("detection backend failed: {0}")]
    Backend(String),
}

/// Contract for the object-detection collaborator.
///
/// The production implementation calls a remote inference service with the
/// image reference from the sensor reading; the simulator and the tests
/// substitute canned responses.
pub trait Detector {
    fn detect(&mut self, image: &str) -> Result<DetectionResult, DetectionError>;
}
