//! Player HTTP handlers

use super::model::{NewPlayer, Player, PlayerPatch};
use crate::core::auth::Authenticated;
use crate::core::error::ApiError;
use crate::core::extractors::ApiJson;
use crate::server::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

pub const PLAYERS_PER_PAGE: usize = 10;

/// Page selector for list-style payloads, `?page=1` by default
///
/// Unparseable values fall back to the first page instead of failing the
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    fn resolve(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or(1)
    }
}

/// Slice a player list down to the requested page
fn paginate(players: &[Player], page: usize) -> &[Player] {
    let page = page.max(1);
    let start = (page - 1) * PLAYERS_PER_PAGE;
    let end = (start + PLAYERS_PER_PAGE).min(players.len());
    if start >= players.len() {
        &[]
    } else {
        &players[start..end]
    }
}

/// `GET /players` — public
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let players = state.store.list_players().await?;
    if players.is_empty() {
        return Err(ApiError::not_found("players"));
    }

    Ok(Json(json!({
        "success": true,
        "total_players": players.len(),
        "players": players,
    })))
}

/// `GET /players/{id}/details` — requires `get:player-details`
pub async fn get_player_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    auth.require("get:player-details")?;

    let player = state
        .store
        .get_player(id)
        .await?
        .ok_or_else(|| ApiError::not_found("player"))?;
    let total = state.store.count_players().await?;

    Ok(Json(json!({
        "success": true,
        "player_details": player,
        "total_players": total,
    })))
}

/// `POST /players` — requires `post:players`
///
/// Validates the body, then checks that team_id/agent_id reference existing
/// rows before inserting; a dangling reference is a 400 with a message naming
/// the offending field.
pub async fn add_player(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    auth: Authenticated,
    ApiJson(body): ApiJson<NewPlayer>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth.require("post:players")?;
    body.validate()?;

    if !state.store.team_exists(body.team_id).await? {
        return Err(ApiError::InvalidReference {
            field: "team_id",
            id: body.team_id,
        });
    }
    if !state.store.agent_exists(body.agent_id).await? {
        return Err(ApiError::InvalidReference {
            field: "agent_id",
            id: body.agent_id,
        });
    }

    let player = state.store.insert_player(body).await?;
    let players = state.store.list_players().await?;
    let current_page = paginate(&players, page.resolve());

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "new_player_id": player.id,
            "new_player": player,
            "players": current_page,
            "total_players": players.len(),
        })),
    ))
}

/// `PATCH /players/{id}` — requires `patch:players`
pub async fn patch_player(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
    ApiJson(patch): ApiJson<PlayerPatch>,
) -> Result<Json<Value>, ApiError> {
    auth.require("patch:players")?;

    if state.store.get_player(id).await?.is_none() {
        return Err(ApiError::not_found("player"));
    }
    patch.validate()?;

    if let Some(team_id) = patch.team_id {
        if !state.store.team_exists(team_id).await? {
            return Err(ApiError::InvalidReference {
                field: "team_id",
                id: team_id,
            });
        }
    }
    if let Some(agent_id) = patch.agent_id {
        if !state.store.agent_exists(agent_id).await? {
            return Err(ApiError::InvalidReference {
                field: "agent_id",
                id: agent_id,
            });
        }
    }

    let updated = state
        .store
        .update_player(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("player"))?;

    Ok(Json(json!({
        "success": true,
        "updated_player": updated,
    })))
}

/// `DELETE /players/{id}` — requires `delete:players`
///
/// Players are leaves: nothing blocks their deletion.
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    auth.require("delete:players")?;

    if !state.store.delete_player(id).await? {
        return Err(ApiError::not_found("player"));
    }
    let total = state.store.count_players().await?;

    Ok(Json(json!({
        "success": true,
        "deleted_id": id,
        "total_players": total,
    })))
}
