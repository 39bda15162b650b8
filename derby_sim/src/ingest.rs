// derby_sim/src/ingest.rs

use derby_core::prelude::SensorReading;
use log::warn;

// Any reading with a timestamp older than this is discarded as useless.
const MAX_MESSAGE_AGE_MS: u64 = 60 * 1_000;

#[derive(Debug, Default)]
pub struct GateStats {
    pub admitted: u64,
    pub rejected_out_of_order: u64,
    pub rejected_stale: u64,
}

/// Admission control for inbound sensor readings.
///
/// The decision engine assumes its input is fresh and ordered; this gate
/// enforces that upstream, so the controller itself never has to reason
/// about transport-level reordering or backlog replays.
#[derive(Debug, Default)]
pub struct MessageGate {
    newest_seen_ms: u64,
    pub stats: GateStats,
}

impl MessageGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the reading may be handed to the controller.
    /// `now_ms` comes from the caller so recorded runs validate the same way
    /// live ones do.
    pub fn admit(&mut self, reading: &SensorReading, now_ms: u64) -> bool {
        if self.newest_seen_ms > reading.timestamp_ms {
            warn!(
                "rejecting out-of-order reading from car {}: {} ms behind the newest seen",
                reading.car_id,
                self.newest_seen_ms - reading.timestamp_ms
            );
            self.stats.rejected_out_of_order += 1;
            return false;
        }
        self.newest_seen_ms = reading.timestamp_ms;

        if reading.timestamp_ms + MAX_MESSAGE_AGE_MS < now_ms {
            warn!(
                "rejecting stale reading from car {}: older than {} ms",
                reading.car_id, MAX_MESSAGE_AGE_MS
            );
            self.stats.rejected_stale += 1;
            return false;
        }

        self.stats.admitted += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use derby_core::prelude::BallColor;

    fn reading(timestamp_ms: u64) -> SensorReading {
        SensorReading {
            car_id: 1,
            timestamp_ms,
            balls_collected: 0,
            battery_left: 90.0,
            color: BallColor::Red,
            obstacle_found: None,
            front_camera_image: "sim://car-1/frames/frame1.jpg".to_string(),
        }
    }

    #[test]
    fn fresh_ordered_readings_are_admitted() {
        let mut gate = MessageGate::new();
        assert!(gate.admit(&reading(1_000), 1_000));
        assert!(gate.admit(&reading(2_000), 2_000));
        assert_eq!(gate.stats.admitted, 2);
    }

    #[test]
    fn out_of_order_readings_are_rejected() {
        let mut gate = MessageGate::new();
        assert!(gate.admit(&reading(5_000), 5_000));
        assert!(!gate.admit(&reading(4_000), 5_000));
        assert_eq!(gate.stats.rejected_out_of_order, 1);
    }

    #[test]
    fn stale_readings_are_rejected() {
        let mut gate = MessageGate::new();
        let old = reading(1_000);
        assert!(!gate.admit(&old, 1_000 + MAX_MESSAGE_AGE_MS + 1));
        assert_eq!(gate.stats.rejected_stale, 1);
    }

    #[test]
    fn equal_timestamps_are_not_out_of_order() {
        // The gate rejects strictly older readings only; a duplicate
        // timestamp passes through and the controller stays serialized by
        // the caller either way.
        let mut gate = MessageGate::new();
        assert!(gate.admit(&reading(1_000), 1_000));
        assert!(gate.admit(&reading(1_000), 1_000));
    }
}
