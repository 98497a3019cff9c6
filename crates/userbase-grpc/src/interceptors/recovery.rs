//! Panic recovery for handlers.

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tonic::Status;
use tracing::error;

/// Runs a handler, turning a panic into an `INTERNAL` status.
///
/// The panic payload is logged, never sent to the client.
pub async fn recover<T, F>(method: &'static str, handler: F) -> Result<T, Status>
where
    F: Future<Output = Result<T, Status>>,
{
    match AssertUnwindSafe(handler).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(method, panic = %message, "Handler panicked");
            Err(Status::internal("Internal server error"))
        }
    }
}
