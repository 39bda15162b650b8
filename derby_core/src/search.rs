// derby_core/src/search.rs

use crate::command::{Command, Goal};
use crate::config::GameRules;
use crate::history::CommandHistory;
use log::info;
use rand::{Rng, RngCore};

/// After this many fruitless in-place turns the car relocates instead of
/// spinning forever — the target may simply be out of rotation reach.
pub const ESCALATION_TURNS: usize = 5;

// In-place scan step for the ball search. Deliberately not a divisor of 360
// so consecutive sweeps do not revisit the exact same headings.
const BALL_SEARCH_TURN_DEG: i32 = 67;
// The home sign is much larger than a ball, a coarser step finds it.
const HOME_SEARCH_TURN_DEG: i32 = 60;

// Relocation distance is drawn uniformly from [MIN, MIN + SPREAD).
const MIN_RELOCATE_MM: i32 = 300;
const RELOCATE_SPREAD_MM: i32 = 900;
// Chance that a ball relocation drives backward instead of forward.
const REVERSE_CHANCE: f64 = 0.20;

/// Builds the command for a cycle in which no matching ball was in frame:
/// turn in place up to the escalation threshold, then drive a random
/// distance at full speed to take pictures from somewhere else.
pub fn ball_search(rules: &GameRules, history: &CommandHistory, rng: &mut dyn RngCore) -> Command {
    let mut command = Command::new();
    command.set_mode_automatic();

    let turns = history.trailing_count(Goal::SeekBallTurn);
    if turns < ESCALATION_TURNS {
        info!(
            "ball_search: turning {} degrees (scan {} of {})",
            BALL_SEARCH_TURN_DEG,
            turns + 1,
            ESCALATION_TURNS
        );
        command.set_goal(Goal::SeekBallTurn);
        command.set_speed(rules.turn_speed());
        command.make_turn(BALL_SEARCH_TURN_DEG);
    } else {
        let mut distance = MIN_RELOCATE_MM + rng.gen_range(0..RELOCATE_SPREAD_MM);
        if rng.gen_bool(REVERSE_CHANCE) {
            // On rare occasion back out instead; helps when the car has
            // wedged itself somewhere with nothing in view.
            distance = -distance;
        }
        info!("ball_search: relocating by {} mm", distance);
        command.set_goal(Goal::SeekBallMove);
        // Precision does not matter here, so drive at full speed — it may
        // even push stray obstacles out of the way.
        command.set_speed(rules.max_speed);
        command.drive(distance);
    }

    command
}

/// Same escalation shape as [`ball_search`], for the home base sign.
/// Relocation always drives forward and is tagged Go2Base so the controller
/// stays in the home-seeking phase.
pub fn home_search(rules: &GameRules, history: &CommandHistory, rng: &mut dyn RngCore) -> Command {
    let mut command = Command::new();
    command.set_mode_automatic();

    let turns = history.trailing_count(Goal::SeekHomeTurn);
    if turns < ESCALATION_TURNS {
        info!(
            "home_search: turning {} degrees (scan {} of {})",
            HOME_SEARCH_TURN_DEG,
            turns + 1,
            ESCALATION_TURNS
        );
        command.set_goal(Goal::SeekHomeTurn);
        command.set_speed(rules.max_speed);
        command.make_turn(HOME_SEARCH_TURN_DEG);
    } else {
        let distance = MIN_RELOCATE_MM + rng.gen_range(0..RELOCATE_SPREAD_MM);
        info!("home_search: relocating by {} mm", distance);
        command.set_goal(Goal::Go2Base);
        command.set_speed(rules.max_speed);
        command.drive(distance);
    }

    command
}
