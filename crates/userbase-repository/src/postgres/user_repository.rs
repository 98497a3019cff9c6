//! PostgreSQL user repository implementation.

use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;
use userbase_core::{NewUser, User, UserId, UserbaseResult};
use uuid::Uuid;

/// PostgreSQL user repository.
///
/// Expects `users(id UUID PRIMARY KEY DEFAULT gen_random_uuid(), name TEXT
/// NOT NULL, email TEXT NOT NULL)`. Identities are the text form of the UUID.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct PostgresUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PostgresUserRepository {
    /// Creates a new PostgreSQL user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> UserbaseResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        // No row can carry an identity that is not a UUID.
        let Ok(key) = Uuid::parse_str(id.as_str()) else {
            debug!("Identity {} is not a store key", id);
            return Ok(None);
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id::text AS id, name, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, new_user: &NewUser) -> UserbaseResult<User> {
        debug!("Inserting user: {}", new_user.email);

        let id: String = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id::text
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(User::from_new(UserId::new(id), new_user.clone()))
    }
}

impl std::fmt::Debug for PostgresUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresUserRepository").finish_non_exhaustive()
    }
}
