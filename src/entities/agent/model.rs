//! Agent entity model with typed create/patch bodies

use crate::core::error::ValidationError;
use crate::core::validation::finish;
use crate::core::validation::validators::{require_filled, require_filled_opt};
use serde::{Deserialize, Serialize};

/// An agent row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub salary: String,
}

impl Agent {
    /// Apply a patch, leaving absent fields untouched
    pub fn apply(&mut self, patch: &AgentPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(salary) = &patch.salary {
            self.salary = salary.clone();
        }
    }
}

/// Create body for `POST /agents`
#[derive(Debug, Clone, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub salary: String,
}

impl NewAgent {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        require_filled(&mut errors, "name", &self.name);
        require_filled(&mut errors, "salary", &self.salary);
        finish(errors)
    }
}

/// Patch body for `PATCH /agents/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentPatch {
    pub name: Option<String>,
    pub salary: Option<String>,
}

impl AgentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.salary.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        let mut errors = Vec::new();
        require_filled_opt(&mut errors, "name", self.name.as_deref());
        require_filled_opt(&mut errors, "salary", self.salary.as_deref());
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_create_body() {
        let body = NewAgent {
            name: "Test Agent".to_string(),
            salary: "1M".to_string(),
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_empty_salary() {
        let body = NewAgent {
            name: "Test Agent".to_string(),
            salary: "".to_string(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_patch_empty_body_rejected() {
        assert!(matches!(
            AgentPatch::default().validate(),
            Err(ValidationError::EmptyBody)
        ));
    }

    #[test]
    fn test_patch_unknown_key_rejected_at_deserialization() {
        let result = serde_json::from_value::<AgentPatch>(serde_json::json!({
            "agency": "Test Agency"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_updates_only_present_fields() {
        let mut agent = Agent {
            id: 1,
            name: "Before".to_string(),
            salary: "1M".to_string(),
        };
        agent.apply(&AgentPatch {
            salary: Some("2M".to_string()),
            ..Default::default()
        });
        assert_eq!(agent.salary, "2M");
        assert_eq!(agent.name, "Before");
    }
}
