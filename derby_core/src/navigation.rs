// derby_core/src/navigation.rs

use crate::command::{Command, Goal};
use crate::config::{CameraIntrinsics, GameRules};
use crate::detection::{BoundingBox, DetectionError, Detector};
use crate::geometry::PinholeEstimator;
use crate::history::CommandHistory;
use crate::search;
use crate::selector;
use crate::types::{BallColor, CarId, TimestampMs};
use log::info;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// --- Ball approach tuning ---
// At this distance the gripper can close around the ball.
const BALL_CAPTURE_DISTANCE_MM: i32 = 45;
// The gripper tolerates this much bearing error to either side.
const BALL_CAPTURE_ANGLE_DEG: i32 = 11;
// Within this distance the car must move slowly or it kicks the ball away.
const SLOW_APPROACH_ZONE_MM: i32 = 300;
// Creep a little past the estimate so the ball really sits in the gripper.
const BALL_EXTRA_DISTANCE_MM: i32 = 40;

// --- Home approach tuning ---
// Close enough to the base sign to drop the ball.
const HOME_RELEASE_DISTANCE_MM: i32 = 650;
// Overshoot so the car is unambiguously inside the base area.
const HOME_EXTRA_DISTANCE_MM: i32 = 100;

/// One sensor report from the car. Immutable; consumed once per decision
/// cycle. Staleness and ordering checks happen upstream, before a reading
/// ever reaches the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    pub car_id: CarId,
    pub timestamp_ms: TimestampMs,
    /// Balls captured and delivered so far, tracked by the car itself.
    pub balls_collected: u32,
    pub battery_left: f64,
    /// Color of the balls this car is after.
    pub color: BallColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obstacle_found: Option<bool>,
    /// Reference to the frame the car captured for this reading.
    pub front_camera_image: String,
}

/// A decision cycle that could not produce a command.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The detection collaborator failed; the cycle is rejected and the car
    /// stays stationary until the next successful reading.
    #[error("object detection failed: {0}")]
    Detection(#[from] DetectionError),
}

/// High-level goal of the current cycle, recomputed from the trailing
/// command history and the sensor payload on every reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    SeekingBall,
    SeekingHome,
    GameOver,
}

/// The navigation decision engine for one car.
///
/// Holds the outbound command history and turns each sensor reading into a
/// bounded sequence of physical actions. One `Navigator` per car; a single
/// decision must finish before the next reading for the same car is fed in,
/// since each command depends on the history including its predecessor.
pub struct Navigator {
    rules: GameRules,
    estimator: PinholeEstimator,
    detector: Box<dyn Detector + Send>,
    rng: Box<dyn RngCore + Send>,
    history: CommandHistory,
}

impl Navigator {
    pub fn new(
        rules: GameRules,
        camera: CameraIntrinsics,
        detector: Box<dyn Detector + Send>,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            rules,
            estimator: PinholeEstimator::new(camera),
            detector,
            rng,
            history: CommandHistory::new(),
        }
    }

    /// Outbound command history, oldest first.
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Computes the next driving command for a sensor reading.
    ///
    /// On success the command is recorded in the history and returned; on a
    /// collaborator failure the cycle is rejected and the history is left
    /// untouched. Every returned command acknowledges the reading timestamp
    /// and ends by requesting the next sensor message.
    pub fn next_move(&mut self, reading: &SensorReading) -> Result<Command, NavigationError> {
        info!(
            "next_move: car {} has {} balls on board",
            reading.car_id, reading.balls_collected
        );

        let mut command = match self.classify(reading) {
            Phase::SeekingHome => self.navigate_to_home(reading)?,
            Phase::SeekingBall => self.navigate_to_ball(reading)?,
            Phase::GameOver => self.game_over(),
        };

        command.set_correlation_id(reading.timestamp_ms);
        command.send_sensor_message();
        self.history.push(command.clone());
        Ok(command)
    }

    fn classify(&self, reading: &SensorReading) -> Phase {
        if self.history.trailing_count(Goal::Go2Base) > 0
            || self.history.trailing_count(Goal::SeekHomeTurn) > 0
        {
            Phase::SeekingHome
        } else if reading.balls_collected < self.rules.balls_needed {
            Phase::SeekingBall
        } else {
            Phase::GameOver
        }
    }

    fn navigate_to_ball(&mut self, reading: &SensorReading) -> Result<Command, NavigationError> {
        let frame = self.detector.detect(&reading.front_camera_image)?;
        let label = format!("{}{}", reading.color, self.rules.ball_label_suffix);
        let obstacle_found = reading.obstacle_found.unwrap_or(false);

        let command = match selector::find_nearest(&label, &frame) {
            Some(bbox) => self.ball_directions(bbox, obstacle_found),
            None => {
                info!("navigate_to_ball: no {} in frame, searching", label);
                search::ball_search(&self.rules, &self.history, self.rng.as_mut())
            }
        };
        Ok(command)
    }

    fn navigate_to_home(&mut self, reading: &SensorReading) -> Result<Command, NavigationError> {
        let frame = self.detector.detect(&reading.front_camera_image)?;
        let label = format!("{}{}", reading.color, self.rules.home_label_suffix);
        let obstacle_found = reading.obstacle_found.unwrap_or(false);

        let command = match selector::find_nearest(&label, &frame) {
            Some(bbox) => self.home_directions(bbox, obstacle_found),
            None => {
                info!("navigate_to_home: no {} in frame, searching", label);
                search::home_search(&self.rules, &self.history, self.rng.as_mut())
            }
        };
        Ok(command)
    }

    /// Turns a sighted ball into approach or capture actions.
    fn ball_directions(&mut self, bbox: &BoundingBox, obstacle_found: bool) -> Command {
        let angle = self.estimator.angle_of(bbox);
        // A ball is as tall as it is wide, so the diameter goes in twice.
        let diameter = self.rules.ball_diameter_mm;
        let mut distance = self.estimator.distance_mm(bbox, diameter, diameter);

        let mut command = Command::new();
        command.set_mode_automatic();

        if angle.abs() <= BALL_CAPTURE_ANGLE_DEG && distance <= BALL_CAPTURE_DISTANCE_MM {
            // Coming through here with a CheckGrip command just behind us
            // means the ball stayed in the gripper through the backup drive:
            // the grip is confirmed, head for the base.
            if self.history.last_goal() == Some(Goal::CheckGrip) {
                command.set_goal(Goal::Go2Base);
                return command;
            }
            info!("ball_directions: initiating ball capture");
            command.gripper_close();
            command.set_goal(Goal::CheckGrip);
            // Back up; if the ball is still filling the frame on the next
            // reading, it is really gripped and not just nearby.
            command.set_speed(self.rules.drive_speed());
            command.drive(-BALL_CAPTURE_DISTANCE_MM * 3);
            return command;
        }

        let mut speed = self.rules.drive_speed();

        if distance < SLOW_APPROACH_ZONE_MM {
            info!("ball_directions: ball is close, slowing down for the approach");
            command.set_goal(Goal::Go2Ball);
            // Turn gently; jerking the chassis here kicks the ball away.
            command.set_speed(self.rules.turn_speed());
            command.make_turn(angle);
            command.gripper_open();
            speed = self.rules.max_speed / 20;
            distance += BALL_EXTRA_DISTANCE_MM;
        } else if obstacle_found {
            info!("ball_directions: obstacle in the way, treating the ball as lost");
            return search::ball_search(&self.rules, &self.history, self.rng.as_mut());
        } else {
            command.set_goal(Goal::Go2Ball);
            command.make_turn(angle);
            // Stop short of the slow zone; the next cycle finishes the job.
            distance -= SLOW_APPROACH_ZONE_MM / 2;
        }

        command.set_speed(speed);
        command.drive(distance);
        command
    }

    /// Turns a sighted home base sign into approach or release actions.
    fn home_directions(&mut self, bbox: &BoundingBox, obstacle_found: bool) -> Command {
        let angle = self.estimator.angle_of(bbox);
        let distance =
            self.estimator
                .distance_mm(bbox, self.rules.home_width_mm, self.rules.home_height_mm);

        let mut command = Command::new();
        command.set_mode_automatic();

        if distance < HOME_RELEASE_DISTANCE_MM {
            info!("home_directions: close enough to the base, releasing the ball");
            command.add_ball_count();
            command.gripper_open();
            command.set_speed(self.rules.max_speed / 10);
            command.drive(-100);
            command.set_speed(self.rules.max_speed);
            command.drive(-1000);
            command.set_speed(self.rules.turn_speed());
            command.turn_right(90);
            // All driving from here on happens with a closed gripper so
            // stray balls cannot wander into it.
            command.gripper_close();
            command.set_goal(Goal::Go2Ball);
            return command;
        }

        if obstacle_found {
            info!("home_directions: obstacle in the way, treating the base as lost");
            return search::home_search(&self.rules, &self.history, self.rng.as_mut());
        }

        command.set_goal(Goal::Go2Base);
        command.set_speed(self.rules.turn_speed());
        command.make_turn(angle);
        command.set_speed(self.rules.drive_speed());
        command.drive(distance - HOME_RELEASE_DISTANCE_MM + HOME_EXTRA_DISTANCE_MM);
        command
    }

    /// All required balls are home. Nothing left to do but acknowledge
    /// readings; the car stays parked.
    fn game_over(&self) -> Command {
        info!(
            "game_over: all {} required balls have been collected and brought home",
            self.rules.balls_needed
        );
        let mut command = Command::new();
        command.set_goal(Goal::GameEnd);
        command
    }
}
