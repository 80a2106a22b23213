use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::{dto::VocabItem, repo};

pub fn vocab_routes() -> Router<AppState> {
    Router::new()
        .route("/vocab", get(list_vocab).post(save_vocab))
        .route("/vocab/:id", delete(delete_vocab))
}

#[instrument(skip(state))]
pub async fn list_vocab(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<VocabItem>>, ApiError> {
    let db = state.db.pool()?;
    let items = repo::list_for_user(db, user_id).await?;
    Ok(Json(items))
}

#[instrument(skip(state, item))]
pub async fn save_vocab(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(item): Json<VocabItem>,
) -> Result<Json<Value>, ApiError> {
    if item.id.is_empty() || item.term.is_empty() {
        return Err(ApiError::Validation("id and term are required".into()));
    }
    let db = state.db.pool()?;
    repo::upsert(db, user_id, &item).await?;
    Ok(Json(json!({ "status": "saved" })))
}

#[instrument(skip(state))]
pub async fn delete_vocab(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = state.db.pool()?;
    repo::delete(db, user_id, &id).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
