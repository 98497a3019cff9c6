//! User service trait definition.

use crate::dto::CreateUserRequest;
use async_trait::async_trait;
use userbase_core::{Interface, RequestContext, User, UserId, UserbaseResult};

/// User access coordinator.
///
/// Every backend call runs within `ctx`, so the request deadline and
/// cancellation bound the whole operation.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Fetches a user, cache first, falling back to the store.
    async fn get_user(&self, ctx: &RequestContext, id: &UserId) -> UserbaseResult<User>;

    /// Inserts a user into the store, then writes it into the cache.
    async fn create_user(&self, ctx: &RequestContext, request: CreateUserRequest) -> UserbaseResult<User>;
}
