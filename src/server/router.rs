//! Route table and JSON fallbacks
//!
//! Every route is declared here; the required permission for each mutating
//! endpoint lives with its handler. Unknown paths and known-path/wrong-method
//! requests both answer in the API's JSON error shape rather than axum's
//! plain-text defaults.

use super::AppState;
use crate::core::error::ApiError;
use crate::entities::{agent, player, team};
use axum::Json;
use axum::Router;
use axum::routing::get;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router over the given state
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(
            "/players",
            get(player::list_players).post(player::add_player),
        )
        .route(
            "/players/{id}",
            get(player::get_player_details)
                .patch(player::patch_player)
                .delete(player::delete_player),
        )
        .route("/players/{id}/details", get(player::get_player_details))
        .route("/teams", get(team::list_teams).post(team::add_team))
        .route(
            "/teams/{id}",
            get(team::get_team_details)
                .patch(team::patch_team)
                .delete(team::delete_team),
        )
        .route("/teams/{id}/details", get(team::get_team_details))
        .route("/teams/{id}/roster", get(team::get_team_roster))
        .route("/agents", get(agent::list_agents).post(agent::add_agent))
        .route(
            "/agents/{id}",
            get(agent::get_agent_details)
                .patch(agent::patch_agent)
                .delete(agent::delete_agent),
        )
        .route("/agents/{id}/details", get(agent::get_agent_details))
        .route("/agents/{id}/clients", get(agent::get_agent_clients))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /` — liveness probe, no auth
async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "baseball agency api is up",
    }))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("route")
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
