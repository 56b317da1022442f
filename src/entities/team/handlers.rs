//! Team HTTP handlers
//!
//! Team deletion runs the referential guard: a team that still owns players
//! is not deleted, and the response names the blocking players.

use super::model::{NewTeam, TeamPatch};
use crate::core::auth::Authenticated;
use crate::core::error::{ApiError, StorageError};
use crate::core::extractors::ApiJson;
use crate::server::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

/// `GET /teams` — public
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let teams = state.store.list_teams().await?;
    if teams.is_empty() {
        return Err(ApiError::not_found("teams"));
    }

    Ok(Json(json!({
        "success": true,
        "total_teams": teams.len(),
        "teams": teams,
    })))
}

/// `GET /teams/{id}/details` — requires `get:team-details`
pub async fn get_team_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    auth.require("get:team-details")?;

    let team = state
        .store
        .get_team(id)
        .await?
        .ok_or_else(|| ApiError::not_found("team"))?;
    let total = state.store.count_teams().await?;

    Ok(Json(json!({
        "success": true,
        "team_details": team,
        "total_teams": total,
    })))
}

/// `GET /teams/{id}/roster` — requires `get:team-roster`
pub async fn get_team_roster(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    auth.require("get:team-roster")?;

    if state.store.get_team(id).await?.is_none() {
        return Err(ApiError::not_found("team"));
    }
    let roster = state.store.team_roster(id).await?;
    let total = roster.len();

    Ok(Json(json!({
        "success": true,
        "team_id": id,
        "roster": roster,
        "total_team_players": total,
    })))
}

/// `POST /teams` — requires `post:teams`
pub async fn add_team(
    State(state): State<AppState>,
    auth: Authenticated,
    ApiJson(body): ApiJson<NewTeam>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    auth.require("post:teams")?;
    body.validate()?;

    let team = state.store.insert_team(body).await?;
    let total = state.store.count_teams().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "new_team_id": team.id,
            "new_team": team,
            "total_teams": total,
        })),
    ))
}

/// `PATCH /teams/{id}` — requires `patch:teams`
pub async fn patch_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
    ApiJson(patch): ApiJson<TeamPatch>,
) -> Result<Json<Value>, ApiError> {
    auth.require("patch:teams")?;

    if state.store.get_team(id).await?.is_none() {
        return Err(ApiError::not_found("team"));
    }
    patch.validate()?;

    let updated = state
        .store
        .update_team(id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("team"))?;

    Ok(Json(json!({
        "success": true,
        "updated_team": updated,
    })))
}

/// `DELETE /teams/{id}` — requires `delete:teams`
///
/// Referential guard: the dependent check and the delete are separate steps,
/// so a player inserted in between still fails the delete via the store's
/// foreign-key backstop; both paths produce the same blocked response.
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    auth: Authenticated,
) -> Result<Json<Value>, ApiError> {
    auth.require("delete:teams")?;

    if state.store.get_team(id).await?.is_none() {
        return Err(ApiError::not_found("team"));
    }

    let dependents = state.store.players_by_team(id).await?;
    if !dependents.is_empty() {
        return Err(ApiError::StillReferenced {
            resource: "team",
            dependents,
        });
    }

    match state.store.delete_team(id).await {
        Ok(true) => {
            let total = state.store.count_teams().await?;
            Ok(Json(json!({
                "success": true,
                "deleted_id": id,
                "total_teams": total,
            })))
        }
        Ok(false) => Err(ApiError::not_found("team")),
        Err(StorageError::StillReferenced { dependents }) => Err(ApiError::StillReferenced {
            resource: "team",
            dependents,
        }),
        Err(err) => Err(err.into()),
    }
}
