mod dto;
pub mod handlers;
pub mod repo;
pub mod targets;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(handlers::get_profile).put(handlers::put_profile),
    )
}
