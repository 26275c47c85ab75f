//! Request validation helpers.

use crate::api::error::{ApiError, ApiResult};

/// Validate that a required string field is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> ApiResult<()> {
    if value.is_empty() {
        return Err(ApiError::ValidationError(format!("{} cannot be empty", field_name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_value_passes() {
        assert!(validate_not_empty("hello", "text").is_ok());
    }

    #[test]
    fn empty_value_fails() {
        assert!(validate_not_empty("", "text").is_err());
    }
}
