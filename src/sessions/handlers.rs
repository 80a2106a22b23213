use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::{
    dto::{ChatSession, UpsertSessionRequest},
    repo,
};

const DEFAULT_TITLE: &str = "New Conversation";

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(save_session))
        .route("/sessions/:id", delete(delete_session))
}

#[instrument(skip(state))]
pub async fn list_sessions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ChatSession>>, ApiError> {
    let db = state.db.pool()?;
    let sessions = repo::list_for_user(db, user_id).await?;
    Ok(Json(sessions))
}

#[instrument(skip(state, body))]
pub async fn save_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpsertSessionRequest>,
) -> Result<Json<Value>, ApiError> {
    let db = state.db.pool()?;

    let id = body
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let title = body.title.unwrap_or_else(|| DEFAULT_TITLE.into());
    let messages = body.messages.unwrap_or_else(|| json!([]));

    repo::upsert(db, user_id, &id, &title, &messages).await?;
    Ok(Json(json!({ "status": "saved", "id": id })))
}

#[instrument(skip(state))]
pub async fn delete_session(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = state.db.pool()?;
    repo::delete(db, user_id, &id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
