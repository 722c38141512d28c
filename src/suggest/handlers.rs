use axum::{extract::State, Json};
use tracing::instrument;

use super::dto::{RecommendRequest, RecommendationSet};
use super::services;
use crate::auth::AuthUser;
use crate::domain::parse_date;
use crate::error::ApiError;
use crate::ledger::services as ledger;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn recommend(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RecommendRequest>,
) -> Result<Json<RecommendationSet>, ApiError> {
    let day = parse_date(&body.date).ok_or(ApiError::Validation {
        field: "date",
        message: format!("expected YYYY-MM-DD, got {:?}", body.date),
    })?;

    if !state
        .limiter
        .check_and_increment(&format!("recommend:{user_id}"))
        .await
    {
        return Err(ApiError::RateLimited);
    }

    let ctx = ledger::day_context(&state, user_id, day).await?;
    let budget = ledger::remaining_for_slot(
        &state.config.allocation,
        &ctx.targets.macros,
        &ctx.meals,
        body.meal_type,
    );

    let set = services::build_recommendations(
        state.ai.as_ref(),
        body.meal_type,
        budget,
        &ctx.restrictions,
        ctx.targets.defaulted,
    )
    .await?;
    Ok(Json(set))
}
