//! Error types for the flow controller
//!
//! None of these reach a requester: read failures restart the session,
//! write failures are logged and the page is still served.

use crate::stage::Stage;

/// Session store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backing store cannot be reached
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// A stored record exists but cannot be decoded
    #[error("session record corrupt: {0}")]
    Corrupt(String),

    /// Filesystem failure
    #[error("session store I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding a record failed
    #[error("session serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Flow controller errors
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Stage change not allowed by the state machine
    #[error("illegal stage transition {from} -> {to}")]
    IllegalTransition { from: Stage, to: Stage },

    /// Underlying store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Puzzle configuration rejected at start-up
    #[error("puzzle configuration: {0}")]
    Puzzle(#[from] gate_puzzle::PuzzleError),
}
