pub mod dto;
pub mod handlers;
pub mod services;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/remaining", get(handlers::get_remaining))
        .route("/summary", get(handlers::get_summary))
}
