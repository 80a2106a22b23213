//! Per-user preference blob. The backend treats it as opaque JSON:
//! GET returns it verbatim (empty object if none), PUT replaces it
//! wholesale.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(put_settings))
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let db = state.db.pool()?;
    let settings = fetch(db, user_id).await?;
    Ok(Json(settings))
}

#[instrument(skip(state, body))]
pub async fn put_settings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let db = state.db.pool()?;
    store(db, user_id, &body).await?;
    Ok(Json(json!({ "status": "saved" })))
}

async fn fetch(db: &PgPool, user_id: Uuid) -> anyhow::Result<Value> {
    let row: Option<(Value,)> =
        sqlx::query_as("SELECT settings FROM user_settings WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;
    Ok(row.map(|(v,)| v).unwrap_or_else(|| json!({})))
}

async fn store(db: &PgPool, user_id: Uuid, settings: &Value) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_settings (user_id, settings)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET settings = EXCLUDED.settings
        "#,
    )
    .bind(user_id)
    .bind(settings)
    .execute(db)
    .await?;
    Ok(())
}
