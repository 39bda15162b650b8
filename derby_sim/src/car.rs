// derby_sim/src/car.rs

use derby_core::prelude::{Action, BallColor, Command, SensorReading};

// Flat battery drain per reading, percent.
const BATTERY_DRAIN_PER_READING: f64 = 0.05;
// Simulated wall-clock step between readings.
const READING_INTERVAL_MS: u64 = 1_000;

/// Minimal model of the car for closed-loop runs.
///
/// Produces monotonically timestamped sensor readings and applies the
/// effects of outbound commands back onto its own state — which for the
/// decision engine means exactly one thing: the ball counter.
pub struct SimCar {
    id: u32,
    color: BallColor,
    balls_collected: u32,
    battery_left: f64,
    clock_ms: u64,
    frame_counter: u32,
}

impl SimCar {
    pub fn new(id: u32, color: BallColor, battery: f64) -> Self {
        Self {
            id,
            color,
            balls_collected: 0,
            battery_left: battery,
            clock_ms: 1_000,
            frame_counter: 0,
        }
    }

    /// Next sensor reading. Timestamps advance strictly, the battery drains
    /// slowly, and each reading references a fresh frame.
    pub fn reading(&mut self, obstacle_found: bool) -> SensorReading {
        self.clock_ms += READING_INTERVAL_MS;
        self.frame_counter += 1;
        self.battery_left = (self.battery_left - BATTERY_DRAIN_PER_READING).max(0.0);

        SensorReading {
            car_id: self.id,
            timestamp_ms: self.clock_ms,
            balls_collected: self.balls_collected,
            battery_left: self.battery_left,
            color: self.color,
            obstacle_found: Some(obstacle_found),
            front_camera_image: format!(
                "sim://car-{}/frames/frame{}.jpg",
                self.id, self.frame_counter
            ),
        }
    }

    /// Applies a received command to the car state.
    pub fn apply(&mut self, command: &Command) {
        for action in &command.actions {
            if let Action::AddBallCount(n) = action {
                self.balls_collected += n;
            }
        }
    }

    pub fn balls_collected(&self) -> u32 {
        self.balls_collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_have_strictly_increasing_timestamps() {
        let mut car = SimCar::new(1, BallColor::Red, 99.0);
        let a = car.reading(false);
        let b = car.reading(false);
        assert!(b.timestamp_ms > a.timestamp_ms);
        assert!(b.battery_left < a.battery_left);
        assert_ne!(a.front_camera_image, b.front_camera_image);
    }

    #[test]
    fn add_ball_count_actions_raise_the_counter() {
        let mut car = SimCar::new(1, BallColor::Red, 99.0);
        let mut command = Command::new();
        command.add_ball_count();
        command.gripper_open();

        car.apply(&command);
        assert_eq!(car.balls_collected(), 1);

        // Commands without the action leave the counter alone.
        let mut plain = Command::new();
        plain.drive(100);
        car.apply(&plain);
        assert_eq!(car.balls_collected(), 1);
    }
}
