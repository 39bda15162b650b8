// derby_core/src/prelude.rs

// --- Core contracts ---
pub use crate::detection::{DetectionError, Detector};
pub use crate::navigation::{NavigationError, Navigator, SensorReading};

// --- Core data structures ---
pub use crate::command::{Action, Command, DriveMode, Goal, GripperState, SensorRate};
pub use crate::config::{CameraIntrinsics, GameRules};
pub use crate::detection::{BoundingBox, DetectionResult};
pub use crate::history::CommandHistory;
pub use crate::types::{BallColor, CarId, TimestampMs};

// --- Estimation and search helpers ---
pub use crate::geometry::PinholeEstimator;
pub use crate::search::{ball_search, home_search, ESCALATION_TURNS};
pub use crate::selector::find_nearest;
