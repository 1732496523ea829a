//! Resumable, batched uploads of build results to a remote result store.
//!
//! One [`InvocationWriter`] publishes one invocation's result tree —
//! configurations, targets, configured targets, actions — through the
//! store's batch upload API, then finalizes it. The protocol is
//! at-least-once safe: each accepted batch consumes the resume token that
//! authorized it and installs the next one, so a batch resent after a
//! transient failure is either applied or recognized as already applied.
//!
//! # Example flow
//!
//! ```text
//! Caller                     Writer                          Service
//! │  open ──────────────────> CreateInvocation(token t0) ──────> ok
//! │  write_* ×100 ──────────> buffer fills
//! │                           UploadBatch(t0 → t1, 100) ───────> ok
//! │  write_* ×50 ───────────> buffer
//! │  finalize ──────────────> UploadBatch(t1 → t2, 50+marker) ─> ok
//! ```
//!
//! After a crash, reopening the same invocation recovers the service-held
//! token and continues from the first unacknowledged batch. Transient
//! failures are retried with exponential backoff; permanent statuses are
//! surfaced immediately and must not be retried.

mod batch;
mod config;
mod error;
mod retry;
mod token;
mod writer;

pub use config::{Backoff, UploadConfig};
pub use error::{UploadError, is_permanent_status};
pub use retry::retry_rpc;
pub use token::{TokenSource, UuidTokenSource};
pub use writer::InvocationWriter;

// Re-exported so callers can name the client seam without a direct
// dependency on the API crate.
pub use resultstore_api::ResultStoreClient;
