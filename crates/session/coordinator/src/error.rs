//! Coordinator error taxonomy.

use thiserror::Error;

/// Errors surfaced by coordinator commands.
///
/// Only synchronous rejections travel through these values; asynchronous
/// outcomes are reported via dispatched session events. Everything except
/// [`SessionError::BackendUnavailable`] leaves the coordinator in a
/// consistent, reusable state.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No usable transport/session provider. Fatal at construction.
    #[error("session backend unavailable: {0}")]
    BackendUnavailable(String),
    /// A precondition was violated; the request was rejected, not queued.
    #[error("operation rejected: {0}")]
    OperationRejected(&'static str),
    /// The backend refused a request synchronously. The coordinator has
    /// already returned to a stable state; no retry is attempted.
    #[error("operation failed: {0}")]
    OperationFailed(String),
    /// A join referenced missing or out-of-range search data.
    #[error("invalid session reference")]
    InvalidReference,
}
