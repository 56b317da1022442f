//! Team entity model with typed create/patch bodies

use crate::core::error::ValidationError;
use crate::core::validation::finish;
use crate::core::validation::validators::{require_filled, require_filled_opt};
use serde::{Deserialize, Serialize};

/// A team row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    pub city: String,
    pub state: String,
    pub total_payroll: String,
}

impl Team {
    /// Apply a patch, leaving absent fields untouched
    pub fn apply(&mut self, patch: &TeamPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(abbreviation) = &patch.abbreviation {
            self.abbreviation = abbreviation.clone();
        }
        if let Some(city) = &patch.city {
            self.city = city.clone();
        }
        if let Some(state) = &patch.state {
            self.state = state.clone();
        }
        if let Some(total_payroll) = &patch.total_payroll {
            self.total_payroll = total_payroll.clone();
        }
    }
}

/// Create body for `POST /teams`
#[derive(Debug, Clone, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub abbreviation: String,
    pub city: String,
    pub state: String,
    pub total_payroll: String,
}

impl NewTeam {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        require_filled(&mut errors, "name", &self.name);
        require_filled(&mut errors, "abbreviation", &self.abbreviation);
        require_filled(&mut errors, "city", &self.city);
        require_filled(&mut errors, "state", &self.state);
        require_filled(&mut errors, "total_payroll", &self.total_payroll);
        finish(errors)
    }
}

/// Patch body for `PATCH /teams/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub total_payroll: Option<String>,
}

impl TeamPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.abbreviation.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.total_payroll.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        let mut errors = Vec::new();
        require_filled_opt(&mut errors, "name", self.name.as_deref());
        require_filled_opt(&mut errors, "abbreviation", self.abbreviation.as_deref());
        require_filled_opt(&mut errors, "city", self.city.as_deref());
        require_filled_opt(&mut errors, "state", self.state.as_deref());
        require_filled_opt(&mut errors, "total_payroll", self.total_payroll.as_deref());
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_team() -> NewTeam {
        NewTeam {
            name: "Test Team".to_string(),
            abbreviation: "TTT".to_string(),
            city: "Test City".to_string(),
            state: "Test State".to_string(),
            total_payroll: "100M".to_string(),
        }
    }

    #[test]
    fn test_valid_create_body() {
        assert!(new_team().validate().is_ok());
    }

    #[test]
    fn test_create_rejects_empty_abbreviation() {
        let body = NewTeam {
            abbreviation: "".to_string(),
            ..new_team()
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_patch_empty_body_rejected() {
        assert!(matches!(
            TeamPatch::default().validate(),
            Err(ValidationError::EmptyBody)
        ));
    }

    #[test]
    fn test_patch_empty_string_rejected() {
        let patch = TeamPatch {
            city: Some("".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_unknown_key_rejected_at_deserialization() {
        let result = serde_json::from_value::<TeamPatch>(serde_json::json!({
            "stadium": "Test Field"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_updates_only_present_fields() {
        let mut team = Team {
            id: 1,
            name: "Before".to_string(),
            abbreviation: "BBB".to_string(),
            city: "Old City".to_string(),
            state: "Old State".to_string(),
            total_payroll: "50M".to_string(),
        };
        team.apply(&TeamPatch {
            total_payroll: Some("80M".to_string()),
            ..Default::default()
        });
        assert_eq!(team.total_payroll, "80M");
        assert_eq!(team.name, "Before");
        assert_eq!(team.city, "Old City");
    }
}
