//! Request deadline and cancellation scope.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::warn;
use userbase_core::RequestContext;

/// Metadata key carrying the client's timeout.
pub const GRPC_TIMEOUT: &str = "grpc-timeout";

/// Parses a `grpc-timeout` value: at most eight digits followed by a unit
/// (`H`, `M`, `S`, `m`, `u`, `n`).
#[must_use]
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    let unit = value.chars().last()?;
    let digits = &value[..value.len() - unit.len_utf8()];
    if digits.is_empty() || digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    match unit {
        'H' => Some(Duration::from_secs(amount * 3600)),
        'M' => Some(Duration::from_secs(amount * 60)),
        'S' => Some(Duration::from_secs(amount)),
        'm' => Some(Duration::from_millis(amount)),
        'u' => Some(Duration::from_micros(amount)),
        'n' => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}

/// Attaches a [`RequestContext`] to every incoming request.
///
/// The deadline is the client's `grpc-timeout` capped by the server's
/// request timeout. The cancellation token is a child of the server-wide
/// shutdown token.
#[derive(Debug, Clone)]
pub struct RequestContextInterceptor {
    max_timeout: Duration,
    shutdown: CancellationToken,
}

impl RequestContextInterceptor {
    #[must_use]
    pub fn new(max_timeout: Duration, shutdown: CancellationToken) -> Self {
        Self {
            max_timeout,
            shutdown,
        }
    }

    fn timeout_for(&self, header: Option<&str>) -> Duration {
        let requested = header.and_then(|raw| {
            let parsed = parse_grpc_timeout(raw);
            if parsed.is_none() {
                warn!("Ignoring malformed {} value '{}'", GRPC_TIMEOUT, raw);
            }
            parsed
        });
        requested.map_or(self.max_timeout, |timeout| timeout.min(self.max_timeout))
    }
}

impl Interceptor for RequestContextInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        if self.shutdown.is_cancelled() {
            return Err(Status::unavailable("Server is shutting down"));
        }

        let header = request
            .metadata()
            .get(GRPC_TIMEOUT)
            .and_then(|value| value.to_str().ok());
        let timeout = self.timeout_for(header);

        let ctx = RequestContext::with_timeout(timeout).with_cancellation(self.shutdown.child_token());
        request.extensions_mut().insert(ctx);
        Ok(request)
    }
}

/// Returns the context attached by [`RequestContextInterceptor`], or an
/// unbounded one when the interceptor is not installed.
#[must_use]
pub fn request_context<T>(request: &Request<T>) -> RequestContext {
    request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default()
}
