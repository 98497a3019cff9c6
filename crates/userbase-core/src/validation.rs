//! Validation utilities.

use crate::UserbaseError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `UserbaseError` on failure.
    fn validate_request(&self) -> Result<(), UserbaseError> {
        self.validate().map_err(validation_errors_to_userbase_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `UserbaseError::Validation`.
///
/// Fields are reported in name order so the message is stable.
#[must_use]
pub fn validation_errors_to_userbase_error(errors: ValidationErrors) -> UserbaseError {
    let mut field_errors: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                ((*field).to_string(), message)
            })
        })
        .collect();
    field_errors.sort();

    let message = field_errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ");

    UserbaseError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// `true` when the value is empty after trimming.
    #[must_use]
    pub fn is_blank(value: &str) -> bool {
        value.trim().is_empty()
    }

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if is_blank(value) {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}
