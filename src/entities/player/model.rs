//! Player entity model with typed create/patch bodies
//!
//! Players are the leaves of the schema: both `team_id` and `agent_id` are
//! required foreign keys. Jersey number and salary are kept as strings — the
//! canonical schema follows the wire format, not arithmetic needs.

use crate::core::error::ValidationError;
use crate::core::validation::validators::{
    require_filled, require_filled_opt, require_valid_id, require_valid_id_opt,
};
use crate::core::validation::finish;
use serde::{Deserialize, Serialize};

/// A player row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub number: String,
    pub position: String,
    pub salary: String,
    pub team_id: i64,
    pub agent_id: i64,
}

impl Player {
    /// Apply a patch, leaving absent fields untouched
    pub fn apply(&mut self, patch: &PlayerPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(number) = &patch.number {
            self.number = number.clone();
        }
        if let Some(position) = &patch.position {
            self.position = position.clone();
        }
        if let Some(salary) = &patch.salary {
            self.salary = salary.clone();
        }
        if let Some(team_id) = patch.team_id {
            self.team_id = team_id;
        }
        if let Some(agent_id) = patch.agent_id {
            self.agent_id = agent_id;
        }
    }
}

/// Create body for `POST /players`
///
/// Typed deserialization already rejects missing keys and ints-as-strings;
/// `validate` adds the non-empty and positive-id rules.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub number: String,
    pub position: String,
    pub salary: String,
    pub team_id: i64,
    pub agent_id: i64,
}

impl NewPlayer {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        require_filled(&mut errors, "name", &self.name);
        require_filled(&mut errors, "number", &self.number);
        require_filled(&mut errors, "position", &self.position);
        require_filled(&mut errors, "salary", &self.salary);
        require_valid_id(&mut errors, "team_id", self.team_id);
        require_valid_id(&mut errors, "agent_id", self.agent_id);
        finish(errors)
    }
}

/// Patch body for `PATCH /players/{id}`
///
/// Unknown keys are rejected at deserialization; an all-absent body is
/// rejected by `validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub number: Option<String>,
    pub position: Option<String>,
    pub salary: Option<String>,
    pub team_id: Option<i64>,
    pub agent_id: Option<i64>,
}

impl PlayerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.number.is_none()
            && self.position.is_none()
            && self.salary.is_none()
            && self.team_id.is_none()
            && self.agent_id.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        let mut errors = Vec::new();
        require_filled_opt(&mut errors, "name", self.name.as_deref());
        require_filled_opt(&mut errors, "number", self.number.as_deref());
        require_filled_opt(&mut errors, "position", self.position.as_deref());
        require_filled_opt(&mut errors, "salary", self.salary.as_deref());
        require_valid_id_opt(&mut errors, "team_id", self.team_id);
        require_valid_id_opt(&mut errors, "agent_id", self.agent_id);
        finish(errors)
    }
}
