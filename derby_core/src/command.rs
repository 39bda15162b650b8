// derby_core/src/command.rs

use crate::types::{BallColor, TimestampMs};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

// The car gets stuck in limbo when asked to turn by 3 degrees or less, so
// such turns are dropped instead of sent.
const IGNORE_TURN_DEGREES: i32 = 3;
// Hard cap on a single turn, degrees.
const MAX_TURN_DEGREES: i32 = 1000;
// Hard cap on a single drive, 5 meters.
const MAX_DRIVE_MM: i32 = 5000;
// Per the motor hat docs speeds above this are ignored by the firmware.
const MAX_SPEED_UNITS: i32 = 1000;

/// Navigation intent that produced a command. Retained in the outbound
/// history and used for the trailing-run escalation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Goal {
    /// Ball in sight, moving towards it.
    #[serde(rename = "go2ball")]
    Go2Ball,
    /// Base in sight (or ball gripped), moving towards the base.
    #[serde(rename = "go2base")]
    Go2Base,
    /// No ball of the needed color in sight, scanning by turning in place.
    SeekBallTurn,
    /// Scanning did not help, relocating to take pictures elsewhere.
    SeekBallMove,
    /// No home base of the needed color in sight, scanning by turning.
    SeekHomeTurn,
    /// Gripper closed on a ball, verifying the grip on the next frame.
    CheckGrip,
    /// All required balls delivered.
    #[serde(rename = "missionComplete")]
    GameEnd,
}

/// Who is driving the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveMode {
    /// Operated by a human; inbound sensor messages are ignored.
    Manual,
    /// Self-driving.
    Automatic,
    /// Commands are held for a human to release one by one.
    Debug,
}

/// How often the car should send sensor messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorRate {
    /// Only when a command asks for one.
    OnDemand,
    /// Non-stop picture taking.
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GripperState {
    Open,
    Close,
}

/// One primitive action for the car to execute. Serializes to the
/// single-key map form the car firmware expects, e.g. `{"turnRight": 22}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Degrees; negative, as issued by the left-turn call.
    TurnLeft(i32),
    /// Degrees; positive.
    TurnRight(i32),
    /// Millimeters; positive.
    DriveForwardMm(i32),
    /// Millimeters; negative, as issued by the backward-drive call.
    DriveBackwardMm(i32),
    /// Wheel rotation degrees per second.
    SetSpeed(i32),
    SetColor(BallColor),
    GripperPosition(GripperState),
    TakePhoto(bool),
    SendSensorMessage(bool),
    AddBallCount(u32),
}

/// Driving command message sent from the controller to the car.
///
/// The action list executes sequentially on the car and can be arbitrarily
/// long. The builder methods validate each append on its own; invalid input
/// drops that one action with a debug log and the command stays usable —
/// the stream is a best-effort robot macro, not a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// When this command was composed, not when it was sent.
    pub cloud_timestamp_ms: TimestampMs,
    /// Timestamp of the sensor message this command answers. The car
    /// validates it against the latest reading it sent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub car_timestamp_ms: Option<TimestampMs>,
    pub mode: DriveMode,
    pub sensor_rate: SensorRate,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub goal: Option<Goal>,
    pub actions: Vec<Action>,
}

impl Command {
    pub fn new() -> Self {
        Self {
            cloud_timestamp_ms: now_ms(),
            car_timestamp_ms: None,
            mode: DriveMode::Manual,
            sensor_rate: SensorRate::OnDemand,
            goal: None,
            actions: Vec::new(),
        }
    }

    pub fn set_correlation_id(&mut self, timestamp_ms: TimestampMs) {
        self.car_timestamp_ms = Some(timestamp_ms);
    }

    pub fn set_goal(&mut self, goal: Goal) {
        self.goal = Some(goal);
    }

    pub fn set_mode_manual(&mut self) {
        self.mode = DriveMode::Manual;
    }

    pub fn set_mode_automatic(&mut self) {
        self.mode = DriveMode::Automatic;
    }

    pub fn set_mode_debug(&mut self) {
        self.mode = DriveMode::Debug;
    }

    pub fn set_on_demand_sensor_rate(&mut self) {
        self.sensor_rate = SensorRate::OnDemand;
    }

    pub fn set_continuous_sensor_rate(&mut self) {
        self.sensor_rate = SensorRate::Continuous;
    }

    /// Signed turn: positive degrees turn right, negative turn left.
    pub fn make_turn(&mut self, degrees: i32) {
        if degrees > 0 {
            self.turn_right(degrees);
        } else {
            self.turn_left(degrees);
        }
    }

    pub fn turn_left(&mut self, degrees: i32) {
        if degrees < 0 && degrees.abs() > IGNORE_TURN_DEGREES {
            self.actions
                .push(Action::TurnLeft(degrees.max(-MAX_TURN_DEGREES)));
        } else {
            debug!("turn_left({}) dropped: inside dead zone", degrees);
        }
    }

    pub fn turn_right(&mut self, degrees: i32) {
        if degrees > IGNORE_TURN_DEGREES {
            self.actions
                .push(Action::TurnRight(degrees.min(MAX_TURN_DEGREES)));
        } else {
            debug!("turn_right({}) dropped: inside dead zone", degrees);
        }
    }

    /// Signed drive: positive millimeters forward, negative backward.
    pub fn drive(&mut self, mm: i32) {
        if mm > 0 {
            self.drive_forward(mm);
        } else {
            self.drive_backward(mm);
        }
    }

    pub fn drive_forward(&mut self, mm: i32) {
        if mm > 0 {
            self.actions
                .push(Action::DriveForwardMm(mm.min(MAX_DRIVE_MM)));
        } else {
            debug!("drive_forward({}) dropped: not a forward distance", mm);
        }
    }

    pub fn drive_backward(&mut self, mm: i32) {
        if mm <= 0 {
            self.actions
                .push(Action::DriveBackwardMm(mm.max(-MAX_DRIVE_MM)));
        } else {
            debug!("drive_backward({}) dropped: not a backward distance", mm);
        }
    }

    pub fn set_speed(&mut self, speed: i32) {
        if speed > 0 {
            self.actions
                .push(Action::SetSpeed(speed.min(MAX_SPEED_UNITS)));
        } else {
            debug!("set_speed({}) dropped: speed must be positive", speed);
        }
    }

    pub fn set_color(&mut self, color: BallColor) {
        self.actions.push(Action::SetColor(color));
    }

    pub fn gripper_open(&mut self) {
        self.actions.push(Action::GripperPosition(GripperState::Open));
    }

    pub fn gripper_close(&mut self) {
        self.actions
            .push(Action::GripperPosition(GripperState::Close));
    }

    pub fn take_photo(&mut self) {
        self.actions.push(Action::TakePhoto(true));
    }

    /// Ask the car for the next sensor message once the actions finish.
    pub fn send_sensor_message(&mut self) {
        self.actions.push(Action::SendSensorMessage(true));
    }

    /// Tell the car that one more ball has been delivered.
    pub fn add_ball_count(&mut self) {
        self.actions.push(Action::AddBallCount(1));
    }

    /// True when the command carries no actions (mode/goal changes only).
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as TimestampMs)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_dead_zone_drops_small_turns() {
        let mut command = Command::new();
        command.turn_left(-2);
        command.turn_right(2);
        command.turn_right(3);
        assert!(command.actions.is_empty());

        command.turn_right(4);
        assert_eq!(command.actions, vec![Action::TurnRight(4)]);
    }

    #[test]
    fn turns_are_capped_at_1000_degrees() {
        let mut command = Command::new();
        command.turn_right(5000);
        command.turn_left(-5000);
        assert_eq!(
            command.actions,
            vec![Action::TurnRight(1000), Action::TurnLeft(-1000)]
        );
    }

    #[test]
    fn make_turn_dispatches_by_sign() {
        let mut command = Command::new();
        command.make_turn(40);
        command.make_turn(-25);
        assert_eq!(
            command.actions,
            vec![Action::TurnRight(40), Action::TurnLeft(-25)]
        );
    }

    #[test]
    fn drive_rejects_sign_mismatches_and_caps() {
        let mut command = Command::new();
        command.drive_forward(-10);
        command.drive_backward(10);
        assert!(command.actions.is_empty());

        command.drive(7000);
        command.drive(-7000);
        assert_eq!(
            command.actions,
            vec![Action::DriveForwardMm(5000), Action::DriveBackwardMm(-5000)]
        );
    }

    #[test]
    fn speed_must_be_positive_and_capped() {
        let mut command = Command::new();
        command.set_speed(0);
        command.set_speed(-5);
        assert!(command.actions.is_empty());

        command.set_speed(4000);
        assert_eq!(command.actions, vec![Action::SetSpeed(1000)]);
    }

    #[test]
    fn mode_and_rate_are_scalar_fields() {
        let mut command = Command::new();
        assert_eq!(command.mode, DriveMode::Manual);
        assert_eq!(command.sensor_rate, SensorRate::OnDemand);

        command.set_mode_automatic();
        command.set_mode_debug();
        command.set_continuous_sensor_rate();
        assert_eq!(command.mode, DriveMode::Debug);
        assert_eq!(command.sensor_rate, SensorRate::Continuous);
        assert!(command.actions.is_empty());
    }

    #[test]
    fn wire_format_uses_single_key_action_maps() {
        let mut command = Command::new();
        command.set_mode_automatic();
        command.set_goal(Goal::Go2Ball);
        command.set_correlation_id(1519592078100);
        command.turn_right(22);
        command.set_speed(333);
        command.drive(111);
        command.gripper_open();
        command.send_sensor_message();

        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["mode"], "automatic");
        assert_eq!(json["sensorRate"], "onDemand");
        assert_eq!(json["goal"], "go2ball");
        assert_eq!(json["carTimestampMs"], 1519592078100u64);
        assert_eq!(json["actions"][0]["turnRight"], 22);
        assert_eq!(json["actions"][1]["setSpeed"], 333);
        assert_eq!(json["actions"][2]["driveForwardMm"], 111);
        assert_eq!(json["actions"][3]["gripperPosition"], "open");
        assert_eq!(json["actions"][4]["sendSensorMessage"], true);
    }

    #[test]
    fn goal_wire_names() {
        assert_eq!(serde_json::to_value(Goal::GameEnd).unwrap(), "missionComplete");
        assert_eq!(serde_json::to_value(Goal::SeekBallTurn).unwrap(), "seekBallTurn");
        assert_eq!(serde_json::to_value(Goal::Go2Base).unwrap(), "go2base");
    }

    #[test]
    fn command_round_trips_through_json() {
        let mut command = Command::new();
        command.set_mode_automatic();
        command.set_goal(Goal::CheckGrip);
        command.gripper_close();
        command.drive(-135);

        let json = serde_json::to_string(&command).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, command);
    }
}
