//! Reusable field validators
//!
//! Each validator appends to an error list instead of failing fast, so a
//! response can report every offending field at once.

use crate::core::error::FieldValidationError;

/// A string field must be present with a non-empty value
pub fn require_filled(errors: &mut Vec<FieldValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldValidationError {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
}

/// An optional string field, if present, must be non-empty
pub fn require_filled_opt(
    errors: &mut Vec<FieldValidationError>,
    field: &'static str,
    value: Option<&str>,
) {
    if let Some(value) = value {
        require_filled(errors, field, value);
    }
}

/// A foreign-key field must be a positive identifier
pub fn require_valid_id(errors: &mut Vec<FieldValidationError>, field: &'static str, value: i64) {
    if value <= 0 {
        errors.push(FieldValidationError {
            field: field.to_string(),
            message: "must be a positive integer id".to_string(),
        });
    }
}

/// An optional foreign-key field, if present, must be a positive identifier
pub fn require_valid_id_opt(
    errors: &mut Vec<FieldValidationError>,
    field: &'static str,
    value: Option<i64>,
) {
    if let Some(value) = value {
        require_valid_id(errors, field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === require_filled ===

    #[test]
    fn test_require_filled_accepts_value() {
        let mut errors = Vec::new();
        require_filled(&mut errors, "name", "Test Player");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_require_filled_rejects_empty() {
        let mut errors = Vec::new();
        require_filled(&mut errors, "name", "");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn test_require_filled_rejects_whitespace_only() {
        let mut errors = Vec::new();
        require_filled(&mut errors, "name", "   ");
        assert_eq!(errors.len(), 1);
    }

    // === require_filled_opt ===

    #[test]
    fn test_require_filled_opt_ignores_none() {
        let mut errors = Vec::new();
        require_filled_opt(&mut errors, "salary", None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_require_filled_opt_rejects_present_empty() {
        let mut errors = Vec::new();
        require_filled_opt(&mut errors, "salary", Some(""));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "salary");
    }

    // === require_valid_id ===

    #[test]
    fn test_require_valid_id_accepts_positive() {
        let mut errors = Vec::new();
        require_valid_id(&mut errors, "team_id", 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_require_valid_id_rejects_zero() {
        let mut errors = Vec::new();
        require_valid_id(&mut errors, "team_id", 0);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_require_valid_id_rejects_negative() {
        let mut errors = Vec::new();
        require_valid_id(&mut errors, "agent_id", -4);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_errors_accumulate_across_fields() {
        let mut errors = Vec::new();
        require_filled(&mut errors, "name", "");
        require_filled(&mut errors, "position", "");
        require_valid_id(&mut errors, "team_id", 0);
        assert_eq!(errors.len(), 3);
    }
}
