// derby_core/src/config.rs

use serde::{Deserialize, Serialize};

/// Intrinsics of the forward-facing camera mounted on the gripper.
///
/// The defaults describe the stock 1/4" sensor module shipped with the car.
/// The focal length is adjustable on that lens, so it has to be calibrated
/// whenever the optics are touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraIntrinsics {
    /// Horizontal field of view, degrees out of 360.
    pub h_field_of_view_deg: f64,
    pub sensor_width_mm: f64,
    pub sensor_height_mm: f64,
    pub focal_length_mm: f64,
    /// Distance from the lens to a fully captured ball. Defined by where the
    /// camera sits on the gripper, not by the optics.
    pub min_distance_to_camera_mm: f64,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            h_field_of_view_deg: 120.0,
            sensor_width_mm: 3.6,
            sensor_height_mm: 2.7,
            focal_length_mm: 2.594,
            min_distance_to_camera_mm: 21.0,
        }
    }
}

/// Game parameters and the physical dimensions of the objects on the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameRules {
    /// How many balls need to be collected and delivered to win.
    pub balls_needed: u32,
    /// Diameter of the ball.
    pub ball_diameter_mm: f64,
    /// Width of the home base sign. The letter is not printed edge to edge,
    /// so this is smaller than the paper itself.
    pub home_width_mm: f64,
    /// Height of the home base sign.
    pub home_height_mm: f64,
    /// Detection labels are "<color><suffix>", e.g. "redBall".
    pub ball_label_suffix: String,
    /// Detection labels are "<color><suffix>", e.g. "redHome".
    pub home_label_suffix: String,
    /// Max wheel speed (wheel rotation degrees per second).
    pub max_speed: i32,
}

impl GameRules {
    /// Speed used for in-place turns. Slow enough not to skew the chassis.
    pub fn turn_speed(&self) -> i32 {
        self.max_speed / 10
    }

    /// Cruising speed. The left and right motors do not run perfectly even,
    /// so driving at max speed pulls the car sideways.
    pub fn drive_speed(&self) -> i32 {
        self.max_speed / 3
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            balls_needed: 3,
            ball_diameter_mm: 60.64,
            home_width_mm: 200.0,
            home_height_mm: 250.0,
            ball_label_suffix: "Ball".to_string(),
            home_label_suffix: "Home".to_string(),
            max_speed: 1000,
        }
    }
}
