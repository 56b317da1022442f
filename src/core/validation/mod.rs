//! Request-body validation
//!
//! Create and patch bodies are typed per-entity structs (see each entity's
//! `model` module); the entity calls the field validators here and folds the
//! collected errors through [`finish`].

pub mod validators;

use crate::core::error::{FieldValidationError, ValidationError};

/// Fold collected field errors into a validation result
pub fn finish(errors: Vec<FieldValidationError>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::FieldErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_empty_is_ok() {
        assert!(finish(Vec::new()).is_ok());
    }

    #[test]
    fn test_finish_with_errors_fails() {
        let errors = vec![FieldValidationError {
            field: "name".to_string(),
            message: "must not be empty".to_string(),
        }];
        let err = finish(errors).expect_err("should fail");
        assert!(matches!(err, ValidationError::FieldErrors(ref list) if list.len() == 1));
    }
}
