//! Error taxonomy for upload operations.
//!
//! The service distinguishes two classes of failure: permanent statuses
//! that will never succeed on retry, and everything else, which is assumed
//! transient and retried with backoff. Callers are expected to treat
//! [`UploadError::Exhausted`] like a permanent failure for that operation;
//! no further retry happens internally.

use thiserror::Error;
use tonic::{Code, Status};

/// Errors surfaced by the writer and the retry engine.
#[derive(Debug, Error)]
pub enum UploadError {
    /// A write was attempted after the invocation was finalized. Reported
    /// locally; no remote call is made.
    #[error("invocation is finalized; no further writes are accepted")]
    Finalized,

    /// The service answered with a status that will never succeed on retry.
    #[error("permanent result store failure: {0}")]
    Permanent(#[source] Status),

    /// The retry budget (steps or deadline) was spent without a permanent
    /// verdict; carries the last transient status observed.
    #[error("retries exhausted: {0}")]
    Exhausted(#[source] Status),
}

impl UploadError {
    /// Whether the remote rejected the operation permanently. Callers must
    /// not retry these.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }

    /// Whether the underlying status is `AlreadyExists`.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::Permanent(status) if status.code() == Code::AlreadyExists)
    }

    /// The remote status behind this error, if there is one.
    pub fn status(&self) -> Option<&Status> {
        match self {
            Self::Permanent(status) | Self::Exhausted(status) => Some(status),
            Self::Finalized => None,
        }
    }
}

/// Whether `status` is one of the codes the service never accepts on retry.
///
/// Everything outside this set, including `Unknown`, is treated as
/// transient and retried with exponential backoff.
pub fn is_permanent_status(status: &Status) -> bool {
    matches!(
        status.code(),
        Code::AlreadyExists
            | Code::NotFound
            | Code::InvalidArgument
            | Code::FailedPrecondition
            | Code::Unimplemented
            | Code::PermissionDenied
    )
}
