// derby_sim/src/scripted.rs

//! Deterministic stand-ins for the external collaborators: a cyclic canned
//! detection service and a canned driving script.

use derby_core::prelude::{Command, DetectionError, DetectionResult, Detector};

/// Detection double that cycles through a fixed list of frames, one per
/// call, wrapping around at the end.
pub struct ScriptedDetector {
    frames: Vec<DetectionResult>,
    index: usize,
}

impl ScriptedDetector {
    pub fn new(frames: Vec<DetectionResult>) -> Self {
        Self { frames, index: 0 }
    }
}

impl Detector for ScriptedDetector {
    fn detect(&mut self, _image: &str) -> Result<DetectionResult, DetectionError> {
        if self.frames.is_empty() {
            return Err(DetectionError::Backend("no scripted frames loaded".into()));
        }
        let frame = self.frames[self.index % self.frames.len()].clone();
        self.index += 1;
        Ok(frame)
    }
}

/// One step of the canned driving script.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackStep {
    pub turn1: i32,
    pub speed: i32,
    pub forward: i32,
    pub turn2: i32,
    pub backward: i32,
}

/// Pre-set driving commands issued to the car regardless of sensor input.
/// Useful for exercising the transport and the car firmware without any
/// vision in the loop.
pub struct CommandPlayback {
    steps: Vec<PlaybackStep>,
    index: usize,
}

impl CommandPlayback {
    pub fn new(steps: Vec<PlaybackStep>) -> Self {
        Self { steps, index: 0 }
    }

    /// A little figure-eight-ish drive that exercises turns in both
    /// directions, forward drives, and the dead-zone filtering.
    pub fn with_default_script() -> Self {
        let steps = vec![
            step(0, 80, 100, 0, 0),
            step(-90, 80, 0, 180, 0),
            step(0, 80, 40, 0, 0),
            step(45, 80, 0, -12, 0),
            step(0, 80, 60, 0, 0),
            step(-10, 80, 0, 0, 0),
            step(0, 80, 80, 0, 0),
            step(25, 80, 0, 0, 0),
            step(0, 80, 10, 0, 0),
            step(-5, 80, 0, 0, 0),
        ];
        Self::new(steps)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Builds the next scripted command, wrapping around at the end of the
    /// script. Zero-valued turns and drives fall into the builder's dead
    /// zones and are dropped on the floor, as intended.
    pub fn next_command(&mut self) -> Command {
        let step = self.steps[self.index % self.steps.len()];
        self.index += 1;

        let mut command = Command::new();
        command.make_turn(step.turn1);
        command.set_speed(step.speed);
        command.drive_forward(step.forward);
        command.make_turn(step.turn2);
        command.drive_backward(step.backward);
        command
    }
}

fn step(turn1: i32, speed: i32, forward: i32, turn2: i32, backward: i32) -> PlaybackStep {
    PlaybackStep {
        turn1,
        speed,
        forward,
        turn2,
        backward,
    }
}
