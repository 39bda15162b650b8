// derby_sim/src/cli.rs

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Derby: a closed-loop simulator for the ball-collecting car controller.
///
/// Feeds scripted camera frames and sensor readings through the navigation
/// decision engine and prints the driving commands it would send to the car.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run a scenario end to end.
    Run(RunArgs),
    /// Compose a one-off manual driving command and print it as JSON.
    Drive(DriveArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "derby_sim/scenarios/three_balls.toml")]
    pub scenario: PathBuf,

    /// Seed for the deterministic PRNG behind the search strategy.
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Stop after this many decision cycles even if the game did not finish.
    #[arg(long, default_value_t = 60)]
    pub max_cycles: u32,

    /// Print every outbound command to stdout as JSON.
    #[arg(long, default_value_t = false)]
    pub print_commands: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DriveArgs {
    /// Turn speed, wheel rotation degrees per second (1 to 1000).
    #[arg(long)]
    pub turn_speed: Option<i32>,

    /// Turn angle in degrees; positive for right, negative for left.
    #[arg(long)]
    pub turn: Option<i32>,

    /// Driving speed, wheel rotation degrees per second (1 to 1000).
    #[arg(long)]
    pub drive_speed: Option<i32>,

    /// Drive distance in mm; positive for forward, negative for backward.
    #[arg(long)]
    pub distance: Option<i32>,

    /// Open the gripper.
    #[arg(long, default_value_t = false)]
    pub gripper_open: bool,

    /// Close the gripper.
    #[arg(long, default_value_t = false)]
    pub gripper_close: bool,

    /// Ask the car to send sensor messages only when requested.
    #[arg(long, default_value_t = false)]
    pub on_demand: bool,

    /// Ask the car to stream sensor messages non-stop.
    #[arg(long, default_value_t = false)]
    pub continuous: bool,
}
