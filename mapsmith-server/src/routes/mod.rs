//! Route table for the knowledge-map service.

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod questions;
pub mod upload;

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload::upload_pdf))
        .route("/generate-questions", post(questions::generate_questions))
        .route("/test-ollama", get(health::test_ollama))
        .route("/health", get(health::health))
        .with_state(state)
}
