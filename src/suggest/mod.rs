pub mod backend;
mod dto;
pub mod fallback;
pub mod handlers;
pub mod parse;
pub mod prompt;
mod services;
pub mod validator;

use axum::{routing::post, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/recommend", post(handlers::recommend))
}
