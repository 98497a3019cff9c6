//! gRPC health service implementation.

use crate::proto::health::{
    health_check_response::ServingStatus,
    health_server::Health,
    HealthCheckRequest, HealthCheckResponse,
};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};
use tracing::debug;

/// Fully qualified name of the user service, as reported by health checks.
pub const USER_SERVICE_NAME: &str = "userbase.user.UserService";

/// Health service implementation.
///
/// Reports `SERVING` until the shutdown token is cancelled, `NOT_SERVING`
/// afterwards.
#[derive(Debug, Default)]
pub struct HealthServiceImpl {
    shutdown: CancellationToken,
}

impl HealthServiceImpl {
    /// Creates a new health service bound to the server's shutdown token.
    pub fn new(shutdown: CancellationToken) -> Self {
        Self { shutdown }
    }

    /// Gets the health status for a service.
    fn get_status(&self, service: &str) -> ServingStatus {
        debug!("Health check for service: {}", service);

        match service {
            "" | USER_SERVICE_NAME if self.shutdown.is_cancelled() => ServingStatus::NotServing,
            "" | USER_SERVICE_NAME => ServingStatus::Serving,
            _ => ServingStatus::ServiceUnknown,
        }
    }
}

#[tonic::async_trait]
impl Health for HealthServiceImpl {
    async fn check(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<HealthCheckResponse>, Status> {
        let req = request.into_inner();
        let status = self.get_status(&req.service);

        if status == ServingStatus::ServiceUnknown {
            return Err(Status::not_found(format!("Unknown service '{}'", req.service)));
        }

        Ok(Response::new(HealthCheckResponse {
            status: status.into(),
        }))
    }

    type WatchStream = ReceiverStream<Result<HealthCheckResponse, Status>>;

    async fn watch(
        &self,
        request: Request<HealthCheckRequest>,
    ) -> Result<Response<Self::WatchStream>, Status> {
        let req = request.into_inner();
        let status = self.get_status(&req.service);

        let (tx, rx) = tokio::sync::mpsc::channel(2);

        // Send initial status
        let _ = tx
            .send(Ok(HealthCheckResponse {
                status: status.into(),
            }))
            .await;

        if status == ServingStatus::Serving {
            let shutdown = self.shutdown.clone();
            tokio::spawn(async move {
                tokio::select! {
                    () = shutdown.cancelled() => {
                        let _ = tx
                            .send(Ok(HealthCheckResponse {
                                status: ServingStatus::NotServing.into(),
                            }))
                            .await;
                    }
                    () = tx.closed() => {}
                }
            });
        }

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    fn check_request(service: &str) -> Request<HealthCheckRequest> {
        Request::new(HealthCheckRequest {
            service: service.to_string(),
        })
    }

    #[tokio::test]
    async fn test_check_serving() {
        let health = HealthServiceImpl::new(CancellationToken::new());

        for service in ["", "userbase.user.UserService"] {
            let response = health.check(check_request(service)).await.unwrap();
            assert_eq!(response.into_inner().status, ServingStatus::Serving as i32);
        }
    }

    #[test]
    fn test_user_service_name_matches_generated() {
        use crate::proto::user::user_service_server::UserServiceServer;
        use tonic::server::NamedService;

        assert_eq!(
            <UserServiceServer<crate::UserGrpcService> as NamedService>::NAME,
            USER_SERVICE_NAME
        );
    }

    #[tokio::test]
    async fn test_check_unknown_service() {
        let health = HealthServiceImpl::new(CancellationToken::new());
        let status = health.check(check_request("other.Service")).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn test_check_after_shutdown() {
        let shutdown = CancellationToken::new();
        let health = HealthServiceImpl::new(shutdown.clone());
        shutdown.cancel();

        let response = health.check(check_request("")).await.unwrap();
        assert_eq!(response.into_inner().status, ServingStatus::NotServing as i32);
    }

    #[tokio::test]
    async fn test_watch_reports_shutdown() {
        let shutdown = CancellationToken::new();
        let health = HealthServiceImpl::new(shutdown.clone());

        let mut stream = health.watch(check_request("")).await.unwrap().into_inner();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.status, ServingStatus::Serving as i32);

        shutdown.cancel();
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.status, ServingStatus::NotServing as i32);
        assert!(stream.next().await.is_none());
    }
}
