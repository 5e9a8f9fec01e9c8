use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{UserError, UserResult};

/// Per-request metadata threaded through every operation.
///
/// Carries a correlation id for logs, an optional deadline and a cancellation
/// token. Clones share the same token, so cancelling one handle cancels all
/// of them.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            ..Self::new()
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Mark the request as abandoned.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        if self.cancel.is_cancelled() {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// Fail fast once the caller has gone away or the deadline passed.
    pub fn ensure_active(&self) -> UserResult<()> {
        if self.is_cancelled() {
            return Err(UserError::Cancelled);
        }
        Ok(())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_is_active() {
        let cx = RequestContext::new();

        assert!(!cx.is_cancelled());
        assert!(cx.ensure_active().is_ok());
    }

    #[test]
    fn cancel_trips_all_clones() {
        let cx = RequestContext::new();
        let other = cx.clone();

        cx.cancel();

        assert!(other.is_cancelled());
        assert!(matches!(other.ensure_active(), Err(UserError::Cancelled)));
    }

    #[test]
    fn expired_deadline_counts_as_cancelled() {
        let cx = RequestContext::with_timeout(Duration::ZERO);

        assert!(cx.is_cancelled());
    }

    #[test]
    fn clones_share_a_request_id() {
        let cx = RequestContext::new();

        assert_eq!(cx.request_id(), cx.clone().request_id());
    }
}
