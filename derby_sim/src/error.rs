// derby_sim/src/error.rs

use thiserror::Error;

/// Simulator error type
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Navigation error: {0}")]
    Navigation(#[from] derby_core::navigation::NavigationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<figment::Error> for SimError {
    fn from(e: figment::Error) -> Self {
        SimError::Scenario(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
