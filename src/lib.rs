//! # Baseball Agency API
//!
//! A REST API managing the three entities of a baseball sports agency —
//! players, teams and agents — backed by a relational store, with role-scoped
//! JWT authorization on mutating endpoints.
//!
//! ## Features
//!
//! - **Typed request bodies**: per-entity create/patch structs validated
//!   before any domain object is built
//! - **Foreign-key aware writes**: a player's `team_id`/`agent_id` must
//!   reference existing rows; violations return a structured 400
//! - **Referential guard**: a team or agent that still owns players cannot be
//!   deleted; the response lists the blocking players
//! - **Permission gate**: each mutating endpoint declares a required
//!   permission string checked against the caller's verified claims
//! - **Pluggable storage**: in-memory store by default, PostgreSQL behind the
//!   `postgres` feature flag
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use baseball_agency::prelude::*;
//!
//! let config = AppConfig::from_env()?;
//! let state = AppState::new(Arc::new(InMemoryStore::new()), Arc::new(JwtVerifier::new(&config.jwt)));
//! let app = build_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{Authenticated, Claims, JwtVerifier},
        error::{ApiError, Dependent, StorageError, ValidationError},
        extractors::ApiJson,
        service::AgencyStore,
    };

    // === Entities ===
    pub use crate::entities::{
        agent::model::{Agent, AgentPatch, NewAgent},
        player::model::{NewPlayer, Player, PlayerPatch},
        team::model::{NewTeam, Team, TeamPatch},
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{AppConfig, JwtConfig};

    // === Server ===
    pub use crate::server::{AppState, build_router};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
