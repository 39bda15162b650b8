// derby_core/src/history.rs

use crate::command::{Command, Goal};
use crate::search::ESCALATION_TURNS;
use std::collections::VecDeque;

// Keep at most one hour of commands at one command per second.
const MAX_HISTORY: usize = 60 * 60;
// The trailing-run queries never need to look further back than one past
// the search escalation threshold.
const MAX_LOOKBACK: usize = ESCALATION_TURNS + 1;

/// Append-only log of commands sent to the car, owned by the controller.
///
/// Past entries are never modified; they are the source of truth for "how
/// many consecutive turns have we done". The buffer is bounded by dropping
/// the oldest entries, which cannot disturb the trailing-run queries since
/// the capacity is far larger than the lookback window.
#[derive(Debug, Default)]
pub struct CommandHistory {
    commands: VecDeque<Command>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        if self.commands.len() >= MAX_HISTORY {
            self.commands.pop_front();
        }
        self.commands.push_back(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Goal of the most recent command, if any.
    pub fn last_goal(&self) -> Option<Goal> {
        self.commands.back().and_then(|c| c.goal)
    }

    /// Number of most recent consecutive commands tagged with `goal`.
    ///
    /// The scan is capped at the escalation window, so the cost per cycle
    /// stays constant no matter how long the run actually is.
    pub fn trailing_count(&self, goal: Goal) -> usize {
        self.commands
            .iter()
            .rev()
            .take(MAX_LOOKBACK)
            .take_while(|c| c.goal == Some(goal))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}
