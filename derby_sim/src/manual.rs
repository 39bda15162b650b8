// derby_sim/src/manual.rs

use crate::cli::DriveArgs;
use derby_core::prelude::Command;

/// Builds a Manual-mode driving command from operator input.
///
/// Action order mirrors the control panel: turn speed before the turn,
/// drive speed before the drive, so each motion runs at its own speed.
pub fn manual_command(args: &DriveArgs) -> Command {
    let mut command = Command::new();
    command.set_mode_manual();

    if let Some(speed) = args.turn_speed {
        command.set_speed(speed);
    }
    if let Some(angle) = args.turn {
        command.make_turn(angle);
    }
    if let Some(speed) = args.drive_speed {
        command.set_speed(speed);
    }
    if let Some(distance) = args.distance {
        command.drive(distance);
    }
    if args.on_demand {
        command.set_on_demand_sensor_rate();
        command.take_photo();
    }
    if args.gripper_open {
        command.gripper_open();
    }
    if args.gripper_close {
        command.gripper_close();
    }
    if args.continuous {
        command.set_continuous_sensor_rate();
        command.take_photo();
    }
    command.send_sensor_message();

    command
}
