//! gRPC server setup.

use crate::interceptors::RequestContextInterceptor;
use crate::proto::{health, user};
use crate::services::{HealthServiceImpl, UserGrpcService};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use userbase_config::ServerConfig;
use userbase_core::{UserbaseError, UserbaseResult};
use userbase_service::UserService;

/// gRPC server exposing the user service and the health service.
///
/// Stops accepting calls and cancels every in-flight request once the
/// shutdown token is cancelled.
pub struct GrpcServer {
    addr: SocketAddr,
    request_timeout: Duration,
    user_service: Arc<dyn UserService>,
    shutdown: CancellationToken,
}

impl GrpcServer {
    /// Creates a new gRPC server.
    pub fn new(
        config: &ServerConfig,
        user_service: Arc<dyn UserService>,
        shutdown: CancellationToken,
    ) -> UserbaseResult<Self> {
        let addr = config.grpc_addr().parse().map_err(|e| {
            UserbaseError::Configuration(format!("Invalid gRPC address: {}", e))
        })?;

        Ok(Self {
            addr,
            request_timeout: config.request_timeout(),
            user_service,
            shutdown,
        })
    }

    /// Address the server binds in [`GrpcServer::serve`].
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Binds the configured address and serves until shutdown.
    pub async fn serve(self) -> UserbaseResult<()> {
        let listener = TcpListener::bind(self.addr).await.map_err(|e| {
            UserbaseError::Internal(format!("Failed to bind {}: {}", self.addr, e))
        })?;
        self.serve_with_listener(listener).await
    }

    /// Serves on an already bound listener until shutdown.
    pub async fn serve_with_listener(self, listener: TcpListener) -> UserbaseResult<()> {
        let local_addr = listener.local_addr().map_err(|e| {
            UserbaseError::Internal(format!("Failed to read listener address: {}", e))
        })?;
        info!("Starting gRPC server on {}", local_addr);

        let health_service = HealthServiceImpl::new(self.shutdown.clone());
        let user_grpc_service = UserGrpcService::new(self.user_service);
        let interceptor = RequestContextInterceptor::new(self.request_timeout, self.shutdown.clone());

        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_grpc())
            .layer(PropagateRequestIdLayer::x_request_id());

        let shutdown = self.shutdown.clone();

        Server::builder()
            .layer(layers)
            .add_service(health::health_server::HealthServer::new(health_service))
            .add_service(user::user_service_server::UserServiceServer::with_interceptor(
                user_grpc_service,
                interceptor,
            ))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                shutdown.cancelled().await;
                info!("gRPC server shutting down, in-flight requests are cancelled");
            })
            .await
            .map_err(|e| UserbaseError::Internal(format!("gRPC server error: {}", e)))?;

        info!("gRPC server stopped");
        Ok(())
    }
}
