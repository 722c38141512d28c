mod dto;
pub mod engine;
pub mod handlers;
pub mod repo;
mod services;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/swap", post(handlers::post_swap))
        .route("/swap-status", get(handlers::swap_status))
}
