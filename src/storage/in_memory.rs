//! In-memory implementation of AgencyStore for testing and development
//!
//! Uses an RwLock around plain BTreeMaps; rows come back in id order for
//! free. Foreign keys and the referential guard are enforced under the write
//! lock, which plays the role the database constraint plays in the
//! PostgreSQL backend: a dependent inserted concurrently still fails the
//! delete.

use crate::core::error::{Dependent, StorageError};
use crate::core::service::AgencyStore;
use crate::entities::agent::model::{Agent, AgentPatch, NewAgent};
use crate::entities::player::model::{NewPlayer, Player, PlayerPatch};
use crate::entities::team::model::{NewTeam, Team, TeamPatch};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    players: BTreeMap<i64, Player>,
    teams: BTreeMap<i64, Team>,
    agents: BTreeMap<i64, Agent>,
    next_player_id: i64,
    next_team_id: i64,
    next_agent_id: i64,
}

/// In-memory store implementation
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Tables::default())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.inner
            .read()
            .map_err(|e| StorageError::backend(format!("failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.inner
            .write()
            .map_err(|e| StorageError::backend(format!("failed to acquire write lock: {}", e)))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn dependents_by<'a>(
    players: impl Iterator<Item = &'a Player>,
    predicate: impl Fn(&Player) -> bool,
) -> Vec<Dependent> {
    players
        .filter(|p| predicate(p))
        .map(|p| Dependent {
            id: p.id,
            name: p.name.clone(),
        })
        .collect()
}

#[async_trait]
impl AgencyStore for InMemoryStore {
    // === players ===

    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.read()?.players.values().cloned().collect())
    }

    async fn get_player(&self, id: i64) -> Result<Option<Player>, StorageError> {
        Ok(self.read()?.players.get(&id).cloned())
    }

    async fn insert_player(&self, new: NewPlayer) -> Result<Player, StorageError> {
        let mut tables = self.write()?;

        if !tables.teams.contains_key(&new.team_id) {
            return Err(StorageError::InvalidReference {
                message: format!("team {} does not exist", new.team_id),
            });
        }
        if !tables.agents.contains_key(&new.agent_id) {
            return Err(StorageError::InvalidReference {
                message: format!("agent {} does not exist", new.agent_id),
            });
        }

        tables.next_player_id += 1;
        let player = Player {
            id: tables.next_player_id,
            name: new.name,
            number: new.number,
            position: new.position,
            salary: new.salary,
            team_id: new.team_id,
            agent_id: new.agent_id,
        };
        tables.players.insert(player.id, player.clone());

        Ok(player)
    }

    async fn update_player(
        &self,
        id: i64,
        patch: PlayerPatch,
    ) -> Result<Option<Player>, StorageError> {
        let mut tables = self.write()?;

        if let Some(team_id) = patch.team_id {
            if !tables.teams.contains_key(&team_id) {
                return Err(StorageError::InvalidReference {
                    message: format!("team {} does not exist", team_id),
                });
            }
        }
        if let Some(agent_id) = patch.agent_id {
            if !tables.agents.contains_key(&agent_id) {
                return Err(StorageError::InvalidReference {
                    message: format!("agent {} does not exist", agent_id),
                });
            }
        }

        let Some(player) = tables.players.get_mut(&id) else {
            return Ok(None);
        };
        player.apply(&patch);

        Ok(Some(player.clone()))
    }

    async fn delete_player(&self, id: i64) -> Result<bool, StorageError> {
        Ok(self.write()?.players.remove(&id).is_some())
    }

    async fn count_players(&self) -> Result<u64, StorageError> {
        Ok(self.read()?.players.len() as u64)
    }

    async fn players_by_team(&self, team_id: i64) -> Result<Vec<Dependent>, StorageError> {
        let tables = self.read()?;
        Ok(dependents_by(tables.players.values(), |p| {
            p.team_id == team_id
        }))
    }

    async fn players_by_agent(&self, agent_id: i64) -> Result<Vec<Dependent>, StorageError> {
        let tables = self.read()?;
        Ok(dependents_by(tables.players.values(), |p| {
            p.agent_id == agent_id
        }))
    }

    async fn team_roster(&self, team_id: i64) -> Result<Vec<Player>, StorageError> {
        Ok(self
            .read()?
            .players
            .values()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn agent_clients(&self, agent_id: i64) -> Result<Vec<Player>, StorageError> {
        Ok(self
            .read()?
            .players
            .values()
            .filter(|p| p.agent_id == agent_id)
            .cloned()
            .collect())
    }

    // === teams ===

    async fn list_teams(&self) -> Result<Vec<Team>, StorageError> {
        Ok(self.read()?.teams.values().cloned().collect())
    }

    async fn get_team(&self, id: i64) -> Result<Option<Team>, StorageError> {
        Ok(self.read()?.teams.get(&id).cloned())
    }

    async fn insert_team(&self, new: NewTeam) -> Result<Team, StorageError> {
        let mut tables = self.write()?;

        tables.next_team_id += 1;
        let team = Team {
            id: tables.next_team_id,
            name: new.name,
            abbreviation: new.abbreviation,
            city: new.city,
            state: new.state,
            total_payroll: new.total_payroll,
        };
        tables.teams.insert(team.id, team.clone());

        Ok(team)
    }

    async fn update_team(&self, id: i64, patch: TeamPatch) -> Result<Option<Team>, StorageError> {
        let mut tables = self.write()?;

        let Some(team) = tables.teams.get_mut(&id) else {
            return Ok(None);
        };
        team.apply(&patch);

        Ok(Some(team.clone()))
    }

    async fn delete_team(&self, id: i64) -> Result<bool, StorageError> {
        // Dependent check and removal happen under one write lock; this is
        // the in-memory equivalent of the database FK backstop.
        let mut tables = self.write()?;

        if !tables.teams.contains_key(&id) {
            return Ok(false);
        }

        let dependents = dependents_by(tables.players.values(), |p| p.team_id == id);
        if !dependents.is_empty() {
            return Err(StorageError::StillReferenced { dependents });
        }

        tables.teams.remove(&id);
        Ok(true)
    }

    async fn count_teams(&self) -> Result<u64, StorageError> {
        Ok(self.read()?.teams.len() as u64)
    }

    async fn team_exists(&self, id: i64) -> Result<bool, StorageError> {
        Ok(self.read()?.teams.contains_key(&id))
    }

    // === agents ===

    async fn list_agents(&self) -> Result<Vec<Agent>, StorageError> {
        Ok(self.read()?.agents.values().cloned().collect())
    }

    async fn get_agent(&self, id: i64) -> Result<Option<Agent>, StorageError> {
        Ok(self.read()?.agents.get(&id).cloned())
    }

    async fn insert_agent(&self, new: NewAgent) -> Result<Agent, StorageError> {
        let mut tables = self.write()?;

        tables.next_agent_id += 1;
        let agent = Agent {
            id: tables.next_agent_id,
            name: new.name,
            salary: new.salary,
        };
        tables.agents.insert(agent.id, agent.clone());

        Ok(agent)
    }

    async fn update_agent(
        &self,
        id: i64,
        patch: AgentPatch,
    ) -> Result<Option<Agent>, StorageError> {
        let mut tables = self.write()?;

        let Some(agent) = tables.agents.get_mut(&id) else {
            return Ok(None);
        };
        agent.apply(&patch);

        Ok(Some(agent.clone()))
    }

    async fn delete_agent(&self, id: i64) -> Result<bool, StorageError> {
        let mut tables = self.write()?;

        if !tables.agents.contains_key(&id) {
            return Ok(false);
        }

        let dependents = dependents_by(tables.players.values(), |p| p.agent_id == id);
        if !dependents.is_empty() {
            return Err(StorageError::StillReferenced { dependents });
        }

        tables.agents.remove(&id);
        Ok(true)
    }

    async fn count_agents(&self) -> Result<u64, StorageError> {
        Ok(self.read()?.agents.len() as u64)
    }

    async fn agent_exists(&self, id: i64) -> Result<bool, StorageError> {
        Ok(self.read()?.agents.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store() -> (InMemoryStore, Team, Agent) {
        let store = InMemoryStore::new();
        let team = store
            .insert_team(NewTeam {
                name: "Test Team".to_string(),
                abbreviation: "TTT".to_string(),
                city: "Test City".to_string(),
                state: "Test State".to_string(),
                total_payroll: "100M".to_string(),
            })
            .await
            .expect("insert team");
        let agent = store
            .insert_agent(NewAgent {
                name: "Test Agent".to_string(),
                salary: "1M".to_string(),
            })
            .await
            .expect("insert agent");
        (store, team, agent)
    }

    fn new_player(team_id: i64, agent_id: i64) -> NewPlayer {
        NewPlayer {
            name: "Test Player".to_string(),
            number: "1".to_string(),
            position: "Pitcher".to_string(),
            salary: "1M".to_string(),
            team_id,
            agent_id,
        }
    }

    // === players ===

    #[tokio::test]
    async fn test_insert_and_get_player() {
        let (store, team, agent) = seeded_store().await;
        let player = store
            .insert_player(new_player(team.id, agent.id))
            .await
            .expect("insert should succeed");
        assert_eq!(player.id, 1);

        let fetched = store
            .get_player(player.id)
            .await
            .expect("get should succeed")
            .expect("player should exist");
        assert_eq!(fetched, player);
        assert_eq!(store.count_players().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_player_unknown_team_rejected() {
        let (store, _, agent) = seeded_store().await;
        let err = store
            .insert_player(new_player(42, agent.id))
            .await
            .expect_err("unknown team should fail");
        assert!(matches!(err, StorageError::InvalidReference { .. }));
        assert_eq!(store.count_players().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_player_unknown_agent_rejected() {
        let (store, team, _) = seeded_store().await;
        let err = store
            .insert_player(new_player(team.id, 9000))
            .await
            .expect_err("unknown agent should fail");
        assert!(matches!(err, StorageError::InvalidReference { .. }));
    }

    #[tokio::test]
    async fn test_update_player_applies_patch() {
        let (store, team, agent) = seeded_store().await;
        let player = store
            .insert_player(new_player(team.id, agent.id))
            .await
            .unwrap();

        let updated = store
            .update_player(
                player.id,
                PlayerPatch {
                    salary: Some("5M".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update should succeed")
            .expect("player should exist");
        assert_eq!(updated.salary, "5M");
        assert_eq!(updated.name, player.name);
    }

    #[tokio::test]
    async fn test_update_player_unknown_team_rejected() {
        let (store, team, agent) = seeded_store().await;
        let player = store
            .insert_player(new_player(team.id, agent.id))
            .await
            .unwrap();

        let err = store
            .update_player(
                player.id,
                PlayerPatch {
                    team_id: Some(42),
                    ..Default::default()
                },
            )
            .await
            .expect_err("unknown team should fail");
        assert!(matches!(err, StorageError::InvalidReference { .. }));

        // row unchanged
        let fetched = store.get_player(player.id).await.unwrap().unwrap();
        assert_eq!(fetched.team_id, team.id);
    }

    #[tokio::test]
    async fn test_update_missing_player_returns_none() {
        let (store, _, _) = seeded_store().await;
        let result = store
            .update_player(
                99,
                PlayerPatch {
                    name: Some("X".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_player() {
        let (store, team, agent) = seeded_store().await;
        let player = store
            .insert_player(new_player(team.id, agent.id))
            .await
            .unwrap();

        assert!(store.delete_player(player.id).await.unwrap());
        assert!(store.get_player(player.id).await.unwrap().is_none());
        assert!(!store.delete_player(player.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_players_ordered_by_id() {
        let (store, team, agent) = seeded_store().await;
        for _ in 0..3 {
            store
                .insert_player(new_player(team.id, agent.id))
                .await
                .unwrap();
        }
        let players = store.list_players().await.unwrap();
        let ids: Vec<i64> = players.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    // === referential guard ===

    #[tokio::test]
    async fn test_delete_team_with_players_blocked() {
        let (store, team, agent) = seeded_store().await;
        let player = store
            .insert_player(new_player(team.id, agent.id))
            .await
            .unwrap();

        let err = store
            .delete_team(team.id)
            .await
            .expect_err("delete should be blocked");
        match err {
            StorageError::StillReferenced { dependents } => {
                assert_eq!(dependents.len(), 1);
                assert_eq!(dependents[0].id, player.id);
                assert_eq!(dependents[0].name, player.name);
            }
            other => panic!("expected StillReferenced, got {:?}", other),
        }

        // team row left intact
        assert!(store.get_team(team.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_team_without_players_succeeds() {
        let (store, team, _) = seeded_store().await;
        assert!(store.delete_team(team.id).await.unwrap());
        assert!(store.get_team(team.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_agent_with_clients_blocked() {
        let (store, team, agent) = seeded_store().await;
        store
            .insert_player(new_player(team.id, agent.id))
            .await
            .unwrap();

        let err = store
            .delete_agent(agent.id)
            .await
            .expect_err("delete should be blocked");
        assert!(matches!(err, StorageError::StillReferenced { .. }));
        assert!(store.get_agent(agent.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_team_missing_returns_false() {
        let (store, _, _) = seeded_store().await;
        assert!(!store.delete_team(99).await.unwrap());
    }

    // === relationship queries ===

    #[tokio::test]
    async fn test_team_roster_and_agent_clients() {
        let (store, team, agent) = seeded_store().await;
        let other_team = store
            .insert_team(NewTeam {
                name: "Other Team".to_string(),
                abbreviation: "OTH".to_string(),
                city: "Other City".to_string(),
                state: "Other State".to_string(),
                total_payroll: "50M".to_string(),
            })
            .await
            .unwrap();

        store
            .insert_player(new_player(team.id, agent.id))
            .await
            .unwrap();
        store
            .insert_player(new_player(other_team.id, agent.id))
            .await
            .unwrap();

        let roster = store.team_roster(team.id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].team_id, team.id);

        let clients = store.agent_clients(agent.id).await.unwrap();
        assert_eq!(clients.len(), 2);
    }

    #[tokio::test]
    async fn test_exists_checks() {
        let (store, team, agent) = seeded_store().await;
        assert!(store.team_exists(team.id).await.unwrap());
        assert!(!store.team_exists(99).await.unwrap());
        assert!(store.agent_exists(agent.id).await.unwrap());
        assert!(!store.agent_exists(9000).await.unwrap());
    }
}
