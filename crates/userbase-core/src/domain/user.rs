//! User record.

use crate::UserId;
use serde::{Deserialize, Serialize};

/// A user record as held by the durable store.
///
/// The same shape is written to the cache as its JSON projection, so any
/// field added here must stay serde-compatible with entries already cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identity.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl User {
    /// Builds a record from an inserted row.
    #[must_use]
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        Self {
            id,
            name: new_user.name,
            email: new_user.email,
        }
    }
}

/// Data for a user that has not been inserted yet.
///
/// Has no identity; the store assigns one atomically with the insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
