//! Per-request execution context.
//!
//! Every backend call made on behalf of a request runs through
//! [`RequestContext::run`], which bounds it by the request deadline and by the
//! request's cancellation token. Dropping the surrounding future also drops
//! the backend call, so a disconnected client never leaves work behind.

use crate::{UserbaseError, UserbaseResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation scope of a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Creates a context with no deadline and a fresh cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    /// Sets the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Replaces the cancellation token, e.g. with a child of a server-wide token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Cancels this request and every context derived from it.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Runs one backend operation within this context.
    ///
    /// Returns [`UserbaseError::Cancelled`] without polling `operation` if the
    /// request is already cancelled, and [`UserbaseError::Timeout`] without
    /// polling it if the deadline has already passed.
    pub async fn run<T, F>(&self, name: &str, operation: F) -> UserbaseResult<T>
    where
        F: Future<Output = UserbaseResult<T>>,
    {
        if self.is_cancelled() {
            return Err(UserbaseError::Cancelled);
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => {
                    if Instant::now() >= deadline {
                        return Err(deadline_error(name));
                    }
                    match tokio::time::timeout_at(deadline, operation).await {
                        Ok(result) => result,
                        Err(_) => Err(deadline_error(name)),
                    }
                }
                None => operation.await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(UserbaseError::Cancelled),
            result = bounded => result,
        }
    }
}

fn deadline_error(name: &str) -> UserbaseError {
    UserbaseError::Timeout(format!("{} exceeded the request deadline", name))
}
