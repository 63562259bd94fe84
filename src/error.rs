use thiserror::Error;

use crate::handle::Handle;

/// Errors reported across the session boundary.
///
/// These cover misuse that a well-behaved embedder can trigger: malformed
/// construction requests and stale handles. Violations of internal
/// invariants (ordering, owner-count underflow, arena exhaustion) are
/// programming errors and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed construction request, rejected before any state change.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The operation referenced a handle that is not currently live.
    #[error("invalid handle {handle}")]
    InvalidHandle { handle: Handle },
}

pub type Result<T> = std::result::Result<T, EngineError>;
