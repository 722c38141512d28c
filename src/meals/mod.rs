mod dto;
pub mod handlers;
pub mod repo;
mod services;

use axum::{
    routing::{delete, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/meals", post(handlers::log_meal).get(handlers::list_meals))
        .route("/meals/:id", delete(handlers::delete_meal))
}
