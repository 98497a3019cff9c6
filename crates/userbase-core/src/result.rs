//! Result type aliases for Userbase.

use crate::UserbaseError;

/// A specialized `Result` type for Userbase operations.
pub type UserbaseResult<T> = Result<T, UserbaseError>;
