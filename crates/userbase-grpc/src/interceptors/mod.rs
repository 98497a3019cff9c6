//! Server-side request interceptors.
//!
//! Applied to every call, outermost first: request id and tracing layers
//! (installed by [`crate::GrpcServer`]), the request context interceptor, then
//! panic recovery around each handler.

pub mod deadline;
pub mod recovery;

pub use deadline::{parse_grpc_timeout, request_context, RequestContextInterceptor, GRPC_TIMEOUT};
pub use recovery::recover;
