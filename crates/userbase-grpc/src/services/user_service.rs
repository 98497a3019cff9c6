//! User gRPC service implementation.

use crate::interceptors::{recover, request_context};
use crate::proto::user;
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{debug, error};
use userbase_core::{User, UserId, UserbaseError};
use userbase_service::dto::CreateUserRequest;
use userbase_service::UserService;

/// User gRPC service implementation.
pub struct UserGrpcService {
    user_service: Arc<dyn UserService>,
}

impl UserGrpcService {
    /// Creates a new user gRPC service.
    pub fn new(user_service: Arc<dyn UserService>) -> Self {
        Self { user_service }
    }
}

#[tonic::async_trait]
impl user::user_service_server::UserService for UserGrpcService {
    async fn get_user(
        &self,
        request: Request<user::GetUserRequest>,
    ) -> Result<Response<user::User>, Status> {
        let ctx = request_context(&request);
        let req = request.into_inner();
        debug!("gRPC GetUser: {}", req.id);

        recover("userbase.user.UserService/GetUser", async {
            let user = self
                .user_service
                .get_user(&ctx, &UserId::new(req.id))
                .await
                .map_err(to_status)?;

            Ok(Response::new(to_proto_user(user)))
        })
        .await
    }

    async fn create_user(
        &self,
        request: Request<user::CreateUserRequest>,
    ) -> Result<Response<user::User>, Status> {
        let ctx = request_context(&request);
        let req = request.into_inner();
        debug!("gRPC CreateUser: {}", req.email);

        recover("userbase.user.UserService/CreateUser", async {
            let create_request = CreateUserRequest {
                name: req.name,
                email: req.email,
            };

            let user = self
                .user_service
                .create_user(&ctx, create_request)
                .await
                .map_err(to_status)?;

            Ok(Response::new(to_proto_user(user)))
        })
        .await
    }
}

/// Maps a service error to the gRPC status returned to the client.
pub fn to_status(err: UserbaseError) -> Status {
    match err {
        UserbaseError::NotFound { .. } => {
            debug!("gRPC not found: {}", err);
            Status::not_found(err.to_string())
        }
        UserbaseError::Validation(msg) => Status::invalid_argument(msg),
        UserbaseError::Timeout(msg) => Status::deadline_exceeded(msg),
        UserbaseError::Cancelled => Status::cancelled("Request cancelled"),
        _ => {
            error!(code = err.error_code(), "gRPC error: {:?}", err);
            Status::internal(err.to_string())
        }
    }
}

fn to_proto_user(user: User) -> user::User {
    user::User {
        id: user.id.into_inner(),
        name: user.name,
        email: user.email,
    }
}
