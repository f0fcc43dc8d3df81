pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/extract", post(handlers::handle_extract))
        .route("/api/v1/questions", post(handlers::handle_generate_questions))
        .route("/api/v1/score", post(handlers::handle_score_answers))
        .with_state(state)
}
