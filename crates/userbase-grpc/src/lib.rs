//! # Userbase gRPC
//!
//! gRPC transport for Userbase using Tonic.
//! Exposes `userbase.user.UserService` and `grpc.health.v1.Health`, maps
//! service errors onto status codes and scopes each call with a deadline and
//! a cancellation token.

pub mod interceptors;
pub mod proto;
pub mod server;
pub mod services;

pub use server::*;
pub use services::*;

#[cfg(test)]
mod tests {
    use super::proto::user;
    use super::proto::user::user_service_server::UserService as _;
    use super::services::UserGrpcService;
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Arc;
    use std::time::Duration;
    use tonic::{Code, Request};
    use userbase_core::{NewUser, RequestContext, User, UserId, UserbaseError, UserbaseResult};
    use userbase_service::{CreateUserRequest, UserService};

    mock! {
        pub UserSvc {}

        #[async_trait]
        impl UserService for UserSvc {
            async fn get_user(&self, ctx: &RequestContext, id: &UserId) -> UserbaseResult<User>;
            async fn create_user(&self, ctx: &RequestContext, request: CreateUserRequest) -> UserbaseResult<User>;
        }
    }

    fn ada() -> User {
        User::from_new(UserId::new("7"), NewUser::new("Ada", "ada@example.com"))
    }

    fn grpc(mock: MockUserSvc) -> UserGrpcService {
        UserGrpcService::new(Arc::new(mock))
    }

    fn get_request(id: &str) -> Request<user::GetUserRequest> {
        Request::new(user::GetUserRequest { id: id.to_string() })
    }

    async fn get_status(err: fn() -> UserbaseError) -> Code {
        let mut mock = MockUserSvc::new();
        mock.expect_get_user().returning(move |_, _| Err(err()));
        grpc(mock).get_user(get_request("7")).await.unwrap_err().code()
    }

    #[tokio::test]
    async fn test_grpc_get_user_success() {
        let mut mock = MockUserSvc::new();
        mock.expect_get_user()
            .withf(|_, id| id.as_str() == "7")
            .times(1)
            .returning(|_, _| Ok(ada()));

        let response = grpc(mock).get_user(get_request("7")).await.unwrap();
        let user = response.into_inner();
        assert_eq!(user.id, "7");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_grpc_create_user_success() {
        let mut mock = MockUserSvc::new();
        mock.expect_create_user()
            .withf(|_, request| request.name == "Ada" && request.email == "ada@example.com")
            .times(1)
            .returning(|_, _| Ok(ada()));

        let request = Request::new(user::CreateUserRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        });
        let user = grpc(mock).create_user(request).await.unwrap().into_inner();
        assert_eq!(user.id, "7");
    }

    #[tokio::test]
    async fn test_error_kinds_map_to_status_codes() {
        assert_eq!(get_status(|| UserbaseError::not_found("User", "7")).await, Code::NotFound);
        assert_eq!(get_status(|| UserbaseError::validation("id: required")).await, Code::InvalidArgument);
        assert_eq!(get_status(|| UserbaseError::Timeout("store".to_string())).await, Code::DeadlineExceeded);
        assert_eq!(get_status(|| UserbaseError::Cancelled).await, Code::Cancelled);
        assert_eq!(get_status(|| UserbaseError::Database("down".to_string())).await, Code::Internal);
        assert_eq!(get_status(|| UserbaseError::cache("down")).await, Code::Internal);
        assert_eq!(get_status(|| UserbaseError::internal("stored, not cached")).await, Code::Internal);
    }

    #[tokio::test]
    async fn test_create_failure_is_internal() {
        let mut mock = MockUserSvc::new();
        mock.expect_create_user()
            .returning(|_, _| Err(UserbaseError::internal("User 7 was stored but could not be cached")));

        let request = Request::new(user::CreateUserRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        });
        let status = grpc(mock).create_user(request).await.unwrap_err();
        assert_eq!(status.code(), Code::Internal);
    }

    #[tokio::test]
    async fn test_handler_panic_becomes_internal() {
        let mut mock = MockUserSvc::new();
        mock.expect_get_user().returning(|_, _| panic!("unexpected state"));

        let status = grpc(mock).get_user(get_request("7")).await.unwrap_err();
        assert_eq!(status.code(), Code::Internal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_receives_request_context() {
        let mut mock = MockUserSvc::new();
        mock.expect_get_user()
            .withf(|ctx, _| ctx.remaining() == Some(Duration::from_secs(2)))
            .returning(|_, _| Ok(ada()));

        let mut request = get_request("7");
        request
            .extensions_mut()
            .insert(RequestContext::with_timeout(Duration::from_secs(2)));

        assert!(grpc(mock).get_user(request).await.is_ok());
    }
}
