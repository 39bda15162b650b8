// derby_sim/src/runner.rs

use crate::car::SimCar;
use crate::error::{Result, SimError};
use crate::ingest::MessageGate;
use crate::scenario::{Frame, RunMode, Scenario};
use crate::scripted::{CommandPlayback, ScriptedDetector};
use derby_core::prelude::{Command, Goal, Navigator};
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Counters reported at the end of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub cycles: u32,
    pub commands_sent: u32,
    pub rejected_cycles: u32,
    pub balls_delivered: u32,
    pub game_finished: bool,
}

pub fn run(
    scenario: &Scenario,
    seed: u64,
    max_cycles: u32,
    print_commands: bool,
) -> Result<RunSummary> {
    match scenario.driving.mode {
        RunMode::Manual => {
            // Manual driving ignores inbound readings entirely; the
            // navigation engine is never invoked for this car.
            info!("manual mode: nothing to simulate, use the drive subcommand");
            Ok(RunSummary::default())
        }
        RunMode::Playback => run_playback(scenario, max_cycles, print_commands),
        RunMode::Automatic => run_automatic(scenario, seed, max_cycles, print_commands),
    }
}

fn run_automatic(
    scenario: &Scenario,
    seed: u64,
    max_cycles: u32,
    print_commands: bool,
) -> Result<RunSummary> {
    if scenario.frames.is_empty() {
        return Err(SimError::Scenario(
            "automatic run needs at least one frame".to_string(),
        ));
    }

    let frames: Vec<_> = scenario.frames.iter().map(Frame::to_detection).collect();
    let detector = ScriptedDetector::new(frames);
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let mut navigator = Navigator::new(
        scenario.rules.clone(),
        scenario.camera.clone(),
        Box::new(detector),
        Box::new(rng),
    );

    let mut car = SimCar::new(scenario.car.id, scenario.car.color, scenario.car.battery);
    let mut gate = MessageGate::new();
    let mut summary = RunSummary::default();

    for cycle in 0..max_cycles {
        // The obstacle laser is scripted alongside the camera frames.
        let obstacle = scenario.frames[cycle as usize % scenario.frames.len()].obstacle;
        let reading = car.reading(obstacle);
        summary.cycles += 1;

        if !gate.admit(&reading, reading.timestamp_ms) {
            summary.rejected_cycles += 1;
            continue;
        }

        match navigator.next_move(&reading) {
            Ok(command) => {
                publish(&command, print_commands)?;
                summary.commands_sent += 1;
                car.apply(&command);

                if command.goal == Some(Goal::GameEnd) {
                    summary.game_finished = true;
                    break;
                }
            }
            Err(e) => {
                // A failed decision cycle leaves the car stationary until
                // the next successful reading.
                error!("cycle {} rejected: {}", cycle, e);
                summary.rejected_cycles += 1;
            }
        }
    }

    summary.balls_delivered = car.balls_collected();
    info!(
        "run finished: cycles={} commands={} balls={} finished={}",
        summary.cycles, summary.commands_sent, summary.balls_delivered, summary.game_finished
    );
    Ok(summary)
}

fn run_playback(scenario: &Scenario, max_cycles: u32, print_commands: bool) -> Result<RunSummary> {
    let mut playback = CommandPlayback::with_default_script();
    let mut car = SimCar::new(scenario.car.id, scenario.car.color, scenario.car.battery);
    let mut summary = RunSummary::default();

    for _ in 0..max_cycles {
        let reading = car.reading(false);
        let mut command = playback.next_command();
        command.set_correlation_id(reading.timestamp_ms);

        publish(&command, print_commands)?;
        summary.cycles += 1;
        summary.commands_sent += 1;
        car.apply(&command);
    }

    summary.balls_delivered = car.balls_collected();
    Ok(summary)
}

/// Hands a command to the transport. Here the transport is stdout/logs;
/// delivery is fire-and-forget, exactly like the real message bus client.
fn publish(command: &Command, print_commands: bool) -> Result<()> {
    let json = serde_json::to_string(command)?;
    if print_commands {
        println!("{}", json);
    } else {
        info!("---> {}", json);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{CarSetup, DrivingSetup, ObjectSpec};
    use derby_core::prelude::{BallColor, CameraIntrinsics, GameRules};

    fn object(label: &str, x: f64, y: f64, w: f64, h: f64, score: f64) -> ObjectSpec {
        ObjectSpec {
            label: label.to_string(),
            x,
            y,
            w,
            h,
            score,
        }
    }

    fn frame(objects: Vec<ObjectSpec>) -> Frame {
        Frame {
            objects,
            obstacle: false,
        }
    }

    /// Six scripted frames that walk one ball through approach, capture,
    /// grip check, home approach, and release.
    fn one_ball_scenario() -> Scenario {
        Scenario {
            car: CarSetup {
                id: 1,
                color: BallColor::Red,
                battery: 99.0,
            },
            camera: CameraIntrinsics::default(),
            rules: GameRules {
                balls_needed: 1,
                ..GameRules::default()
            },
            driving: DrivingSetup::default(),
            frames: vec![
                frame(vec![object("redBall", 0.1, 0.5, 0.05, 0.05, 0.97)]),
                frame(vec![object("redBall", 0.4, 0.5, 0.15, 0.15, 0.97)]),
                frame(vec![object("redBall", 0.25, 0.3, 0.5, 0.5, 0.98)]),
                frame(vec![object("redBall", 0.25, 0.3, 0.5, 0.5, 0.98)]),
                frame(vec![object("redHome", 0.4, 0.2, 0.05, 0.1, 0.9)]),
                frame(vec![object("redHome", 0.3, 0.1, 0.3, 0.4, 0.9)]),
            ],
        }
    }

    #[test]
    fn automatic_run_plays_a_full_game() {
        let scenario = one_ball_scenario();
        let summary = run(&scenario, 7, 20, false).unwrap();

        assert!(summary.game_finished, "summary: {:?}", summary);
        assert_eq!(summary.balls_delivered, 1);
        // Six frames to deliver the ball, one more cycle to notice the
        // quota is met.
        assert_eq!(summary.commands_sent, 7);
        assert_eq!(summary.rejected_cycles, 0);
    }

    #[test]
    fn playback_run_sends_one_command_per_cycle() {
        let mut scenario = one_ball_scenario();
        scenario.driving.mode = RunMode::Playback;
        let summary = run(&scenario, 7, 12, false).unwrap();

        assert_eq!(summary.cycles, 12);
        assert_eq!(summary.commands_sent, 12);
        assert!(!summary.game_finished);
    }

    #[test]
    fn manual_run_never_invokes_the_navigator() {
        let mut scenario = one_ball_scenario();
        scenario.driving.mode = RunMode::Manual;
        let summary = run(&scenario, 7, 12, false).unwrap();

        assert_eq!(summary.cycles, 0);
        assert_eq!(summary.commands_sent, 0);
    }
}
