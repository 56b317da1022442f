//! PostgreSQL storage backend using sqlx.
//!
//! Provides a `PostgresStore` implementation of `AgencyStore` backed by a
//! `sqlx::PgPool`. The schema lives in embedded migrations (see
//! `migrations/`); the foreign-key constraints declared there are the
//! backstop behind the application-level referential guard.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! baseball-agency = { version = "0.1", features = ["postgres"] }
//! ```

use crate::core::error::{Dependent, StorageError};
use crate::core::service::AgencyStore;
use crate::entities::agent::model::{Agent, AgentPatch, NewAgent};
use crate::entities::player::model::{NewPlayer, Player, PlayerPatch};
use crate::entities::team::model::{NewTeam, Team, TeamPatch};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Agency store backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to the database and build a pooled store.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::backend(format!("failed to connect: {}", e)))?;

        Ok(Self { pool })
    }

    /// Create a store from an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::backend(format!("migration failed: {}", e)))?;

        tracing::info!("database migrations applied");
        Ok(())
    }
}

/// Map a sqlx error, turning foreign-key violations into the typed variant
/// the handlers understand.
fn map_write_error(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StorageError::InvalidReference {
                message: match db.constraint() {
                    Some(constraint) => format!("foreign key violation on {}", constraint),
                    None => "foreign key violation".to_string(),
                },
            }
        }
        _ => StorageError::backend(err.to_string()),
    }
}

fn map_read_error(err: sqlx::Error) -> StorageError {
    StorageError::backend(err.to_string())
}

async fn fetch_dependents(
    pool: &PgPool,
    sql: &str,
    owner_id: i64,
) -> Result<Vec<Dependent>, StorageError> {
    let rows: Vec<(i64, String)> = sqlx::query_as(sql)
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .map_err(map_read_error)?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| Dependent { id, name })
        .collect())
}

const PLAYERS_BY_TEAM: &str = "SELECT id, name FROM players WHERE team_id = $1 ORDER BY id";
const PLAYERS_BY_AGENT: &str = "SELECT id, name FROM players WHERE agent_id = $1 ORDER BY id";

#[async_trait]
impl AgencyStore for PostgresStore {
    // === players ===

    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        sqlx::query_as::<_, Player>(
            "SELECT id, name, number, position, salary, team_id, agent_id \
             FROM players ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)
    }

    async fn get_player(&self, id: i64) -> Result<Option<Player>, StorageError> {
        sqlx::query_as::<_, Player>(
            "SELECT id, name, number, position, salary, team_id, agent_id \
             FROM players WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)
    }

    async fn insert_player(&self, new: NewPlayer) -> Result<Player, StorageError> {
        sqlx::query_as::<_, Player>(
            "INSERT INTO players (name, number, position, salary, team_id, agent_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, number, position, salary, team_id, agent_id",
        )
        .bind(&new.name)
        .bind(&new.number)
        .bind(&new.position)
        .bind(&new.salary)
        .bind(new.team_id)
        .bind(new.agent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_player(
        &self,
        id: i64,
        patch: PlayerPatch,
    ) -> Result<Option<Player>, StorageError> {
        sqlx::query_as::<_, Player>(
            "UPDATE players SET \
                name = COALESCE($2, name), \
                number = COALESCE($3, number), \
                position = COALESCE($4, position), \
                salary = COALESCE($5, salary), \
                team_id = COALESCE($6, team_id), \
                agent_id = COALESCE($7, agent_id) \
             WHERE id = $1 \
             RETURNING id, name, number, position, salary, team_id, agent_id",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.number)
        .bind(patch.position)
        .bind(patch.salary)
        .bind(patch.team_id)
        .bind(patch.agent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn delete_player(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_players(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await
            .map_err(map_read_error)?;

        Ok(count as u64)
    }

    async fn players_by_team(&self, team_id: i64) -> Result<Vec<Dependent>, StorageError> {
        fetch_dependents(&self.pool, PLAYERS_BY_TEAM, team_id).await
    }

    async fn players_by_agent(&self, agent_id: i64) -> Result<Vec<Dependent>, StorageError> {
        fetch_dependents(&self.pool, PLAYERS_BY_AGENT, agent_id).await
    }

    async fn team_roster(&self, team_id: i64) -> Result<Vec<Player>, StorageError> {
        sqlx::query_as::<_, Player>(
            "SELECT id, name, number, position, salary, team_id, agent_id \
             FROM players WHERE team_id = $1 ORDER BY id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)
    }

    async fn agent_clients(&self, agent_id: i64) -> Result<Vec<Player>, StorageError> {
        sqlx::query_as::<_, Player>(
            "SELECT id, name, number, position, salary, team_id, agent_id \
             FROM players WHERE agent_id = $1 ORDER BY id",
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)
    }

    // === teams ===

    async fn list_teams(&self) -> Result<Vec<Team>, StorageError> {
        sqlx::query_as::<_, Team>(
            "SELECT id, name, abbreviation, city, state, total_payroll \
             FROM teams ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_read_error)
    }

    async fn get_team(&self, id: i64) -> Result<Option<Team>, StorageError> {
        sqlx::query_as::<_, Team>(
            "SELECT id, name, abbreviation, city, state, total_payroll \
             FROM teams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)
    }

    async fn insert_team(&self, new: NewTeam) -> Result<Team, StorageError> {
        sqlx::query_as::<_, Team>(
            "INSERT INTO teams (name, abbreviation, city, state, total_payroll) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, name, abbreviation, city, state, total_payroll",
        )
        .bind(&new.name)
        .bind(&new.abbreviation)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.total_payroll)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_team(&self, id: i64, patch: TeamPatch) -> Result<Option<Team>, StorageError> {
        sqlx::query_as::<_, Team>(
            "UPDATE teams SET \
                name = COALESCE($2, name), \
                abbreviation = COALESCE($3, abbreviation), \
                city = COALESCE($4, city), \
                state = COALESCE($5, state), \
                total_payroll = COALESCE($6, total_payroll) \
             WHERE id = $1 \
             RETURNING id, name, abbreviation, city, state, total_payroll",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.abbreviation)
        .bind(patch.city)
        .bind(patch.state)
        .bind(patch.total_payroll)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn delete_team(&self, id: i64) -> Result<bool, StorageError> {
        // A single DELETE is atomic; the FK constraint rejects it if a
        // dependent player was inserted after the handler's guard check.
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                let dependents = fetch_dependents(&self.pool, PLAYERS_BY_TEAM, id).await?;
                Err(StorageError::StillReferenced { dependents })
            }
            Err(err) => Err(map_read_error(err)),
        }
    }

    async fn count_teams(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await
            .map_err(map_read_error)?;

        Ok(count as u64)
    }

    async fn team_exists(&self, id: i64) -> Result<bool, StorageError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teams WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_read_error)?;

        Ok(exists)
    }

    // === agents ===

    async fn list_agents(&self) -> Result<Vec<Agent>, StorageError> {
        sqlx::query_as::<_, Agent>("SELECT id, name, salary FROM agents ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn get_agent(&self, id: i64) -> Result<Option<Agent>, StorageError> {
        sqlx::query_as::<_, Agent>("SELECT id, name, salary FROM agents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn insert_agent(&self, new: NewAgent) -> Result<Agent, StorageError> {
        sqlx::query_as::<_, Agent>(
            "INSERT INTO agents (name, salary) VALUES ($1, $2) \
             RETURNING id, name, salary",
        )
        .bind(&new.name)
        .bind(&new.salary)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update_agent(
        &self,
        id: i64,
        patch: AgentPatch,
    ) -> Result<Option<Agent>, StorageError> {
        sqlx::query_as::<_, Agent>(
            "UPDATE agents SET \
                name = COALESCE($2, name), \
                salary = COALESCE($3, salary) \
             WHERE id = $1 \
             RETURNING id, name, salary",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.salary)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn delete_agent(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                let dependents = fetch_dependents(&self.pool, PLAYERS_BY_AGENT, id).await?;
                Err(StorageError::StillReferenced { dependents })
            }
            Err(err) => Err(map_read_error(err)),
        }
    }

    async fn count_agents(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agents")
            .fetch_one(&self.pool)
            .await
            .map_err(map_read_error)?;

        Ok(count as u64)
    }

    async fn agent_exists(&self, id: i64) -> Result<bool, StorageError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM agents WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_read_error)?;

        Ok(exists)
    }
}
