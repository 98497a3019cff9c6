//! Cache key generators for consistent key naming.

use userbase_core::UserId;

/// Namespace used when none is configured.
pub const DEFAULT_PREFIX: &str = "userbase:cache";

/// Generate a cache key for a user by ID.
#[must_use]
pub fn user_by_id(prefix: &str, id: &UserId) -> String {
    format!("{}:user:id:{}", prefix, id)
}
