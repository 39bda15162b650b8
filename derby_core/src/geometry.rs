// derby_core/src/geometry.rs

use crate::config::CameraIntrinsics;
use crate::detection::BoundingBox;
use log::debug;

// Lens calibration factor for the bearing estimate, measured on the track.
const ANGLE_CALIBRATION_MULTIPLIER: f64 = 0.75;

// Below this raw estimate the pinhole model is unreliable (the ball is
// partially inside the gripper), so a fixed near-field distance is reported.
const NEAR_FIELD_LIMIT_MM: f64 = 115.0;
const NEAR_FIELD_DISTANCE_MM: f64 = 20.0;
// Between the near-field limit and this bound the raw estimate runs
// consistently long by about 35 mm.
const MID_FIELD_LIMIT_MM: f64 = 325.0;
const MID_FIELD_CORRECTION_MM: f64 = 35.0;

/// Estimates object bearing and range from a single camera frame using a
/// pinhole model of the car camera.
#[derive(Debug, Clone)]
pub struct PinholeEstimator {
    camera: CameraIntrinsics,
}

impl PinholeEstimator {
    pub fn new(camera: CameraIntrinsics) -> Self {
        Self { camera }
    }

    pub fn camera(&self) -> &CameraIntrinsics {
        &self.camera
    }

    /// Horizontal angle between the camera axis and the object center,
    /// rounded to whole degrees. Positive means turn right, negative left.
    pub fn angle_of(&self, bbox: &BoundingBox) -> i32 {
        let offset = bbox.center_x() - 0.5;
        let angle = offset * self.camera.h_field_of_view_deg * ANGLE_CALIBRATION_MULTIPLIER;
        debug!("angle_of: centerX={:.4} angle={:.1}", bbox.center_x(), angle);
        angle.round() as i32
    }

    /// Distance from the gripper to the object, in whole millimeters.
    ///
    /// `real_width_mm`/`real_height_mm` are the physical dimensions of the
    /// labeled object; for a ball pass the diameter twice.
    pub fn distance_mm(&self, bbox: &BoundingBox, real_width_mm: f64, real_height_mm: f64) -> i32 {
        let raw = self.uncorrected_distance_mm(bbox, real_width_mm, real_height_mm);

        // Asymmetric empirical correction, calibrated against tape-measure
        // readings. Do not "simplify" the band edges.
        let corrected = if raw < NEAR_FIELD_LIMIT_MM {
            NEAR_FIELD_DISTANCE_MM
        } else if raw < MID_FIELD_LIMIT_MM {
            raw - MID_FIELD_CORRECTION_MM
        } else {
            raw
        };
        debug!("distance_mm: raw={:.0} corrected={:.0}", raw, corrected);
        corrected.round() as i32
    }

    fn uncorrected_distance_mm(
        &self,
        bbox: &BoundingBox,
        real_width_mm: f64,
        real_height_mm: f64,
    ) -> f64 {
        // The object may be partially out of frame or occluded. Compare the
        // expected aspect ratio with the visible one and measure along
        // whichever side is more completely visible.
        let expected_ratio = real_height_mm / real_width_mm;
        let visible_ratio = bbox.h / bbox.w;

        let (sensor_mm, real_mm, visible) = if expected_ratio < visible_ratio {
            (self.camera.sensor_height_mm, real_height_mm, bbox.h)
        } else {
            (self.camera.sensor_width_mm, real_width_mm, bbox.w)
        };

        self.camera.focal_length_mm * real_mm / (visible * sensor_mm)
            - self.camera.min_distance_to_camera_mm
    }
}
