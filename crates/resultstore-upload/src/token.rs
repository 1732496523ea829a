//! Resume-token generation and tracking.
//!
//! The service recognizes exactly one live resume token per invocation:
//! every accepted batch consumes the token that authorized it and installs
//! the next one. The writer mirrors that state here.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

/// Source of fresh opaque resume tokens.
///
/// Injectable so tests can mint deterministic tokens instead of drawing
/// from a global random source.
pub trait TokenSource: Send + Sync {
    /// Mint a token never returned before.
    fn fresh(&self) -> String;
}

/// Production token source.
///
/// Tokens must be unique per use and base64-encoded bytes, so this encodes
/// a freshly generated UUID's string form with the standard alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokenSource;

impl TokenSource for UuidTokenSource {
    fn fresh(&self) -> String {
        STANDARD.encode(Uuid::new_v4().to_string())
    }
}

/// The one live resume token, tracked across batch boundaries.
pub struct ResumeTokens {
    source: Arc<dyn TokenSource>,
    current: String,
}

impl fmt::Debug for ResumeTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeTokens")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl ResumeTokens {
    /// Start with a freshly minted token, for a new invocation.
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        let current = source.fresh();
        Self { source, current }
    }

    /// The token the next batch must extend from.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Mint the proposed next token for a flush. Not committed until the
    /// service acknowledges the batch; retries of the same flush reuse the
    /// staged value.
    pub fn stage_next(&self) -> String {
        self.source.fresh()
    }

    /// Commit a staged token once the service accepted its batch.
    pub fn commit(&mut self, next: String) {
        self.current = next;
    }

    /// Adopt the token the service reports for an unfinalized invocation
    /// being resumed.
    pub fn adopt(&mut self, token: String) {
        self.current = token;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique_base64_uuids() {
        let source = UuidTokenSource;
        let a = source.fresh();
        let b = source.fresh();
        assert_ne!(a, b);

        let decoded = STANDARD.decode(&a).unwrap();
        let text = String::from_utf8(decoded).unwrap();
        Uuid::parse_str(&text).unwrap();
    }

    #[test]
    fn test_stage_does_not_move_current() {
        let mut tokens = ResumeTokens::new(Arc::new(UuidTokenSource));
        let before = tokens.current().to_owned();

        let staged = tokens.stage_next();
        assert_eq!(tokens.current(), before);
        assert_ne!(staged, before);

        tokens.commit(staged.clone());
        assert_eq!(tokens.current(), staged);
    }

    #[test]
    fn test_adopt_replaces_current() {
        let mut tokens = ResumeTokens::new(Arc::new(UuidTokenSource));
        tokens.adopt("service-held-token".to_owned());
        assert_eq!(tokens.current(), "service-held-token");
    }
}
