use crate::state::AppState;
use axum::Router;

pub mod gateway;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::speech_routes())
}
