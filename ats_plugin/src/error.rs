//! Error types for the plugin boundary.

use thiserror::Error;

use crate::session::SessionState;

/// Errors that can occur at the plugin boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtsError {
    /// I/O array index outside `[0, length)`.
    ///
    /// Recoverable: the access is rejected and the tick continues.
    #[error("I/O array index out of range: {index} (length {length})")]
    OutOfRangeAccess {
        /// Requested index.
        index: i32,
        /// Bound length of the array. -1 when unbound.
        length: i32,
    },

    /// Lifecycle call received out of the allowed state-machine order.
    ///
    /// Indicates a host/integration bug, not a plugin-recoverable condition.
    #[error("protocol violation: {call} called in state {state:?}")]
    ProtocolViolation {
        /// Name of the offending entry point.
        call: &'static str,
        /// Session state at the time of the call.
        state: SessionState,
    },
}

/// Result type for plugin boundary operations.
pub type AtsResult<T> = Result<T, AtsError>;
