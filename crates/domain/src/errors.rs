//! Error types used throughout the engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the scheduling engine
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SlotlineError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The target slot exists but cannot take a booking right now.
    /// The message says whether it was occupied or blocked.
    #[error("Slot unavailable: {0}")]
    SlotUnavailable(String),

    /// A concurrent writer won the race for the same slot or row.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested slot status change is not a legal edge of the
    /// slot state machine.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Rescheduling was requested for an appointment that is already
    /// cancelled; the caller must create a fresh booking instead.
    #[error("Cannot reschedule cancelled appointment: {0}")]
    CannotRescheduleCancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SlotlineError>;
