//! Agent HTTP handlers
//!
//! Agent deletion runs the same referential guard as teams, keyed on the
//! players the agent represents.

use super::model::{NewAgent, AgentPatch};
use crate::core::auth::Authenticated;
use crate::core::error::{ApiError, StorageError};
use crate::core::extractors::ApiJson;
use crate::server::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

/// `GET /agents` — requires `get:agents`
pub async fn list_agents(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    auth.require("get:agents")?;

    let agents = state.store.list_agents().await?;
    if agents.is_empty() {
        return Err(ApiError::not_found("agents"));
    }

    Ok(Json(json!({
        "success": true,
        "total_agents": agents.len(),
        "agents": agents,
    })))
}

/// `GET /agents/{id}/details` — requires `get:agent-details`
pub async fn get_agent_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    auth.require("get:agent-details")?;

    let agent = state
        .store
        .get_agent(id)
        .await?
        .ok_or_else(|| ApiError::not_found("agent"))?;
    let total = state.store.count_agents().await?;

    Ok(Json(json!({
        "success": true,
        "agent_details": agent,
        "total_agents": total,
    })))
}

/// `GET /agents/{id}/clients` — requires `get:agent-clients`
pub async fn get_agent_clients(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    auth.require("get:agent-clients")?;

    if state.store.get_agent(id).await?.is_none() {
        return Err(ApiError::not_found("agent"));
    }
    let clients = state.store.agent_clients(id).await?;
    let total = clients.len();

    Ok(Json(json!({
        "success": true,
        "agent_id": id,
        "clients": clients,
        "total_agent_clients": total,
    })))
}

/// `POST /agents` — requires `post:agents`
pub async fn add_agent(
    State(state): State<AppState>,
    auth: Authenticated,
    ApiJson(body): ApiJson<NewAgent>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth.require("post:agents")?;
    body.validate()?;

    let agent = state.store.insert_agent(body).await?;
    let agents = state.store.list_agents().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "new_agent_id": agent.id,
            "new_agent": agent,
            "total_agents": agents.len(),
            "agents": agents,
        })),
    ))
}

/// `PATCH /agents/{id}` — requires `patch:agents`
pub async fn patch_agent(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
    ApiJson(patch): ApiJson<AgentPatch>,
) -> Result<Json<Value>, ApiError> {
    auth.require("patch:agents")?;

    if state.store.get_agent(id).await?.is_none() {
        return Err(ApiError::not_found("agent"));
    }
    patch.validate()?;

    let updated = state
        .store
        .update_agent(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("agent"))?;

    Ok(Json(json!({
        "success": true,
        "updated_agent": updated,
    })))
}

/// `DELETE /agents/{id}` — requires `delete:agents`
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    auth.require("delete:agents")?;

    if state.store.get_agent(id).await?.is_none() {
        return Err(ApiError::not_found("agent"));
    }

    let dependents = state.store.players_by_agent(id).await?;
    if !dependents.is_empty() {
        return Err(ApiError::StillReferenced {
            resource: "agent",
            dependents,
        });
    }

    match state.store.delete_agent(id).await {
        Ok(true) => {
            let total = state.store.count_agents().await?;
            Ok(Json(json!({
                "success": true,
                "deleted_id": id,
                "total_agents": total,
            })))
        }
        Ok(false) => Err(ApiError::not_found("agent")),
        Err(StorageError::StillReferenced { dependents }) => Err(ApiError::StillReferenced {
            resource: "agent",
            dependents,
        }),
        Err(err) => Err(err.into()),
    }
}
