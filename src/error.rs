//! Error types
//!
//! Configuration errors are fatal at construction time. Service errors are
//! recovered by falling back to cached data. Invariant violations abort the
//! frame. Invalid transitions are logged and ignored.

use thiserror::Error;

use crate::sim::{Action, GamePhase};

/// Invalid setup detected while building a session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Canvas height {height} leaves no room for pipe gaps (must exceed {min})")]
    EmptyGapRange { height: f32, min: f32 },

    #[error("Invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("Invalid tuning value for {field}: {value}")]
    InvalidTuning { field: &'static str, value: f32 },

    #[error("Failed to parse tuning: {0}")]
    Parse(String),
}

/// Score submission or high-score fetch failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Score service returned status {0}")]
    Status(u16),

    #[error("Malformed score service response: {0}")]
    Decode(String),
}

/// Programmer error: malformed data reached the simulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Out-of-order state machine request
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Cannot {action:?} while {from:?}")]
pub struct InvalidTransition {
    pub from: GamePhase,
    pub action: Action,
}
