//! Typed path parameter helpers.

use uuid::Uuid;

use activityhub_core::error::AppError;

/// Parses a UUID from a path segment.
pub fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s).map_err(|_| AppError::validation(format!("Invalid UUID: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use activityhub_core::error::ErrorKind;

    #[test]
    fn test_invalid_uuid_is_validation_error() {
        let err = parse_uuid("not-a-uuid").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
