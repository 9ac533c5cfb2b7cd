pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::gateway::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/generate-image-question",
            post(handlers::handle_generate_image_question),
        )
        .route(
            "/analyze-personality",
            post(handlers::handle_analyze_personality),
        )
        .route("/generate-test", post(handlers::handle_generate_test))
        .route("/match-cv-offre", post(handlers::handle_match_cv_offre))
        .with_state(state)
}
