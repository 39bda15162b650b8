// derby_core/src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Core Type Aliases ---
pub type CarId = u32;
pub type TimestampMs = u64;

/// The four ball/base colors used on the track. The wire format and the
/// detection labels both use the lowercase form ("red", "redBall", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl BallColor {
    pub fn as_str(self) -> &'static str {
        match self {
            BallColor::Red => "red",
            BallColor::Blue => "blue",
            BallColor::Green => "green",
            BallColor::Yellow => "yellow",
        }
    }
}

impl fmt::Display for BallColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BallColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "red" => Ok(BallColor::Red),
            "blue" => Ok(BallColor::Blue),
            "green" => Ok(BallColor::Green),
            "yellow" => Ok(BallColor::Yellow),
            _ => Err(UnknownColor(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ball color '{0}'")]
pub struct UnknownColor(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_case_insensitively() {
        assert_eq!("Red".parse::<BallColor>().unwrap(), BallColor::Red);
        assert_eq!("yellow".parse::<BallColor>().unwrap(), BallColor::Yellow);
        assert!("purple".parse::<BallColor>().is_err());
    }

    #[test]
    fn color_displays_lowercase() {
        assert_eq!(BallColor::Blue.to_string(), "blue");
    }
}
