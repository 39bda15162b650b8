// derby_sim/src/scenario.rs

//! Loading and validation of scenario TOML files.

use crate::error::{Result, SimError};
use derby_core::prelude::{BallColor, BoundingBox, CameraIntrinsics, DetectionResult, GameRules};
use figment::providers::{Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything one simulated run needs: the car, optional camera/rule
/// overrides, and the scripted camera frames the detector will cycle over.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    pub car: CarSetup,
    #[serde(default)]
    pub camera: CameraIntrinsics,
    #[serde(default)]
    pub rules: GameRules,
    #[serde(default)]
    pub driving: DrivingSetup,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CarSetup {
    pub id: u32,
    /// Color of the balls this car is after.
    pub color: BallColor,
    #[serde(default = "default_battery")]
    pub battery: f64,
}

fn default_battery() -> f64 {
    99.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Feed readings through the navigation decision engine.
    #[default]
    Automatic,
    /// Replay the canned driving script; the engine is never invoked.
    Playback,
    /// Operated by a human; inbound readings are ignored entirely.
    Manual,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DrivingSetup {
    pub mode: RunMode,
}

/// One scripted camera frame plus the state of the obstacle laser.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Frame {
    pub objects: Vec<ObjectSpec>,
    pub obstacle: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObjectSpec {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub score: f64,
}

impl Frame {
    pub fn to_detection(&self) -> DetectionResult {
        let mut result = DetectionResult::new();
        for obj in &self.objects {
            result.add_box(BoundingBox::new(
                obj.label.clone(),
                obj.x,
                obj.y,
                obj.w,
                obj.h,
                obj.score,
            ));
        }
        result
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let scenario: Scenario = Figment::new().merge(Toml::file(path)).extract()?;
        scenario.validate(&path.display().to_string())?;
        Ok(scenario)
    }

    fn validate(&self, origin: &str) -> Result<()> {
        if self.driving.mode == RunMode::Automatic && self.frames.is_empty() {
            return Err(SimError::Scenario(format!(
                "scenario '{}' runs the navigator but has no frames",
                origin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Scenario {
        let scenario: Scenario = Figment::new()
            .merge(Toml::string(toml))
            .extract()
            .expect("scenario must parse");
        scenario
    }

    #[test]
    fn minimal_scenario_fills_in_defaults() {
        let scenario = parse(
            r#"
            [car]
            id = 1
            color = "red"

            [[frames]]
            objects = [{ label = "redBall", x = 0.1, y = 0.5, w = 0.1, h = 0.1, score = 0.9 }]
            "#,
        );

        assert_eq!(scenario.car.battery, 99.0);
        assert_eq!(scenario.driving.mode, RunMode::Automatic);
        assert_eq!(scenario.rules, GameRules::default());
        assert_eq!(scenario.camera, CameraIntrinsics::default());
        assert_eq!(scenario.frames.len(), 1);
        assert!(!scenario.frames[0].obstacle);
    }

    #[test]
    fn camera_and_rules_can_be_overridden() {
        let scenario = parse(
            r#"
            [car]
            id = 2
            color = "blue"

            [camera]
            hFieldOfViewDeg = 90.0

            [rules]
            ballsNeeded = 1

            [driving]
            mode = "playback"
            "#,
        );

        assert_eq!(scenario.camera.h_field_of_view_deg, 90.0);
        // Untouched camera fields keep their defaults.
        assert_eq!(scenario.camera.focal_length_mm, 2.594);
        assert_eq!(scenario.rules.balls_needed, 1);
        assert_eq!(scenario.driving.mode, RunMode::Playback);
    }

    #[test]
    fn automatic_scenario_without_frames_is_rejected() {
        let scenario = parse(
            r#"
            [car]
            id = 3
            color = "green"
            "#,
        );
        assert!(scenario.validate("inline").is_err());
    }

    #[test]
    fn frames_convert_to_detection_results() {
        let scenario = parse(
            r#"
            [car]
            id = 1
            color = "red"

            [[frames]]
            objects = [
                { label = "redBall", x = 0.1, y = 0.5, w = 0.1, h = 0.1, score = 0.9 },
                { label = "border", x = 0.0, y = 0.0, w = 0.02, h = 0.9, score = 0.8 },
            ]
            obstacle = true
            "#,
        );

        let detection = scenario.frames[0].to_detection();
        assert_eq!(detection.boxes.len(), 2);
        assert_eq!(detection.boxes[0].label, "redBall");
        assert!(scenario.frames[0].obstacle);
    }
}
