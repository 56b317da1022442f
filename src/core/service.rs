//! Store trait for the agency's entities
//!
//! The API is agnostic to the underlying storage mechanism: handlers talk to
//! a shared [`AgencyStore`] handle injected at startup, never to a global.

use crate::core::error::{Dependent, StorageError};
use crate::entities::agent::model::{Agent, AgentPatch, NewAgent};
use crate::entities::player::model::{NewPlayer, Player, PlayerPatch};
use crate::entities::team::model::{NewTeam, Team, TeamPatch};
use async_trait::async_trait;

/// CRUD plus referential queries over players, teams and agents
///
/// Contract notes for implementors:
/// - `list_*` returns rows ordered by ascending id.
/// - `update_*` returns `Ok(None)` when the row does not exist.
/// - `delete_*` returns `Ok(false)` when the row does not exist.
/// - `delete_team`/`delete_agent` must fail with
///   [`StorageError::StillReferenced`] if dependent players exist at delete
///   time, even if the caller checked beforehand — the database foreign-key
///   constraint (or the write lock) is the backstop for the check-then-act
///   race.
/// - `insert_player`/`update_player` must fail with
///   [`StorageError::InvalidReference`] when a supplied team_id/agent_id does
///   not reference an existing row.
#[async_trait]
pub trait AgencyStore: Send + Sync {
    // === players ===

    async fn list_players(&self) -> Result<Vec<Player>, StorageError>;

    async fn get_player(&self, id: i64) -> Result<Option<Player>, StorageError>;

    async fn insert_player(&self, new: NewPlayer) -> Result<Player, StorageError>;

    async fn update_player(
        &self,
        id: i64,
        patch: PlayerPatch,
    ) -> Result<Option<Player>, StorageError>;

    async fn delete_player(&self, id: i64) -> Result<bool, StorageError>;

    async fn count_players(&self) -> Result<u64, StorageError>;

    /// Players belonging to a team, as guard dependents (id, name)
    async fn players_by_team(&self, team_id: i64) -> Result<Vec<Dependent>, StorageError>;

    /// Players represented by an agent, as guard dependents (id, name)
    async fn players_by_agent(&self, agent_id: i64) -> Result<Vec<Dependent>, StorageError>;

    /// Full player rows of a team, for the roster view
    async fn team_roster(&self, team_id: i64) -> Result<Vec<Player>, StorageError>;

    /// Full player rows of an agent, for the clients view
    async fn agent_clients(&self, agent_id: i64) -> Result<Vec<Player>, StorageError>;

    // === teams ===

    async fn list_teams(&self) -> Result<Vec<Team>, StorageError>;

    async fn get_team(&self, id: i64) -> Result<Option<Team>, StorageError>;

    async fn insert_team(&self, new: NewTeam) -> Result<Team, StorageError>;

    async fn update_team(&self, id: i64, patch: TeamPatch) -> Result<Option<Team>, StorageError>;

    async fn delete_team(&self, id: i64) -> Result<bool, StorageError>;

    async fn count_teams(&self) -> Result<u64, StorageError>;

    async fn team_exists(&self, id: i64) -> Result<bool, StorageError>;

    // === agents ===

    async fn list_agents(&self) -> Result<Vec<Agent>, StorageError>;

    async fn get_agent(&self, id: i64) -> Result<Option<Agent>, StorageError>;

    async fn insert_agent(&self, new: NewAgent) -> Result<Agent, StorageError>;

    async fn update_agent(&self, id: i64, patch: AgentPatch)
    -> Result<Option<Agent>, StorageError>;

    async fn delete_agent(&self, id: i64) -> Result<bool, StorageError>;

    async fn count_agents(&self) -> Result<u64, StorageError>;

    async fn agent_exists(&self, id: i64) -> Result<bool, StorageError>;
}
