use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState};

use super::dto::{ChatRequest, TutorResponse};

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

/// Proxy a turn of conversation to the tutor model. Upstream or parse
/// failures surface as 500 with the upstream message; there is no
/// retry here and no fallback model.
#[instrument(skip(state, body))]
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(body): Json<ChatRequest>,
) -> Result<Json<TutorResponse>, ApiError> {
    let reply = state
        .tutor
        .generate(&body.message, &body.level_context, &body.vocab_context)
        .await
        .map_err(|e| ApiError::Gateway(e.to_string()))?;
    Ok(Json(reply))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_gateway_round_trip() {
        let state = AppState::fake();
        let reply = state
            .tutor
            .generate("やあ", "N5", "猫")
            .await
            .expect("fake gateway");
        assert!(!reply.segments.is_empty());
        assert!(reply.check_conformance().is_ok());
    }

    #[test]
    fn chat_request_accepts_partial_bodies() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.level_context.is_empty());
        assert!(req.vocab_context.is_empty());
    }
}
