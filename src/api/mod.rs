// HTTP API routes (team roster, bracket generation, Challonge mirror,
// tournament settings).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::bracket::{self, BRACKET_SIZE};
use crate::challonge::ChallongeClient;
use crate::db::Database;
use crate::error::AppError;

// ── Request types ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub tournament_id: Option<String>,
    pub iframe_mode: Option<bool>,
}

#[derive(Deserialize)]
pub struct ChallongeBracketParams {
    pub tournament_id: Option<String>,
    /// Challonge also addresses tournaments by their URL slug.
    pub tournament_url: Option<String>,
}

// ── Shared application state ─────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    /// Absent when no Challonge credential is configured; the mirror
    /// endpoint reports a configuration error then.
    pub challonge: Option<Arc<ChallongeClient>>,
}

// ── Router ────────────────────────────────────────────────────────────

pub fn router(db: Arc<Database>, challonge: Option<Arc<ChallongeClient>>) -> Router {
    let state = AppState { db, challonge };

    Router::new()
        .route("/health", get(health_check))
        // Teams
        .route("/api/teams", get(list_teams).post(create_team))
        .route("/api/teams/{id}", delete(delete_team))
        // Bracket
        .route("/api/matches", get(list_matches))
        .route("/api/bracket/generate", post(generate_bracket))
        // Challonge mirror
        .route("/api/challonge/bracket", get(challonge_bracket))
        // Settings
        .route("/api/settings", get(get_settings).put(update_settings))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "bracket-backend" }))
}

// ── Team handlers ─────────────────────────────────────────────────────

async fn list_teams(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let teams = state.db.list_teams().await?;
    Ok((StatusCode::OK, Json(json!(teams))))
}

async fn create_team(
    State(state): State<AppState>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let team = state
        .db
        .create_team(&req.name, req.logo_url.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(json!(team))))
}

async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if state.db.delete_team(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Team not found".into()))
    }
}

// ── Bracket handlers ──────────────────────────────────────────────────

async fn list_matches(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let matches = state.db.list_bracket_matches().await?;
    Ok((StatusCode::OK, Json(json!({ "matches": matches }))))
}

/// Reseed the whole bracket. Full-replace: every existing match is
/// discarded, so calling this mid-tournament destroys in-progress results.
async fn generate_bracket(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let teams = state.db.list_teams().await?;
    // Seeding fails before the destructive write when the pool is short.
    let pairs = bracket::seed_quarterfinals(&teams, &mut rand::thread_rng())?;
    let created = state.db.replace_bracket(&pairs).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "matches_created": created,
            "teams_seeded": BRACKET_SIZE,
        })),
    ))
}

// ── Challonge mirror handler ──────────────────────────────────────────

async fn challonge_bracket(
    State(state): State<AppState>,
    Query(params): Query<ChallongeBracketParams>,
) -> Result<impl IntoResponse, AppError> {
    let client = state
        .challonge
        .as_ref()
        .ok_or_else(|| AppError::Configuration("CHALLONGE_API_KEY not configured".into()))?;

    let tournament_id = params
        .tournament_id
        .or(params.tournament_url)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("tournament_id or tournament_url required".into()))?;

    let snapshot = client.fetch_bracket(&tournament_id).await?;
    Ok((StatusCode::OK, Json(json!(snapshot))))
}

// ── Settings handlers ─────────────────────────────────────────────────

async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let settings = state.db.get_settings().await?;
    Ok((StatusCode::OK, Json(json!(settings))))
}

async fn update_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    // An empty tournament id clears the stored value, same as omitting it.
    let tournament_id = req.tournament_id.as_deref().filter(|id| !id.is_empty());
    let iframe_mode = req.iframe_mode.unwrap_or(false);

    state.db.update_settings(tournament_id, iframe_mode).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "tournament_id": tournament_id,
            "iframe_mode": iframe_mode,
        })),
    ))
}
