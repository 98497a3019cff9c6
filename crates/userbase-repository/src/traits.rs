//! Repository trait definitions.

use async_trait::async_trait;
use userbase_core::{Interface, NewUser, User, UserId, UserbaseResult};

/// Durable user store.
///
/// Implementations must be safe for concurrent use and must assign the
/// identity atomically with the insert.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds a user by ID.
    ///
    /// `Ok(None)` means the store holds no such user. `Err` is reserved for
    /// store failures.
    async fn find_by_id(&self, id: &UserId) -> UserbaseResult<Option<User>>;

    /// Inserts a new user and returns it with its store-assigned identity.
    async fn create(&self, new_user: &NewUser) -> UserbaseResult<User>;
}
