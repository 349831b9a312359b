//! Input validation for API requests.
//!
//! Request bodies deserialize every required field as `Option` so a missing
//! field becomes a 400 validation error with a per-field message rather than
//! an extractor rejection.

use super::error::{ApiError, ValidationErrorBuilder};
use crate::db::Role;

/// Record a "required" error for an absent field, passing present values through
pub fn require<T>(builder: &mut ValidationErrorBuilder, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        builder.add(field, format!("{} is required", field));
    }
    value
}

/// Validate a role name
pub fn validate_role(role: &str) -> Result<Role, String> {
    role.parse()
}

/// Fetch a single required field, failing fast
pub fn required_field<T>(field: &str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation_field(field, format!("{} is required", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_collects_missing_fields() {
        let mut builder = ValidationErrorBuilder::new();
        let present = require(&mut builder, "email", Some("a@example.com"));
        let missing: Option<&str> = require(&mut builder, "password", None);

        assert_eq!(present, Some("a@example.com"));
        assert!(missing.is_none());

        let err = builder.build().unwrap();
        assert_eq!(err.message(), "password is required");
    }

    #[test]
    fn test_validate_role() {
        assert_eq!(validate_role("patient"), Ok(Role::Patient));
        assert!(validate_role("").is_err());
        assert!(validate_role("superuser").is_err());
    }

    #[test]
    fn test_required_field() {
        assert_eq!(required_field("queue_id", Some(3)).unwrap(), 3);
        let err = required_field::<i64>("queue_id", None).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "queue_id is required");
    }
}
