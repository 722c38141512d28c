use axum::{
    extract::{Query, State},
    Json,
};
use tracing::instrument;

use super::dto::{DayQuery, RemainingResponse, SlotBudget, SummaryResponse};
use super::services;
use crate::auth::AuthUser;
use crate::domain::{parse_date, MealSlot};
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn get_remaining(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> Result<Json<RemainingResponse>, ApiError> {
    let day = parse_date(&q.date).ok_or(ApiError::Validation {
        field: "date",
        message: format!("expected YYYY-MM-DD, got {:?}", q.date),
    })?;

    let ctx = services::day_context(&state, user_id, day).await?;
    let slots = MealSlot::ALL
        .into_iter()
        .map(|slot| SlotBudget {
            slot,
            remaining: services::remaining_for_slot(
                &state.config.allocation,
                &ctx.targets.macros,
                &ctx.meals,
                slot,
            ),
        })
        .collect();

    Ok(Json(RemainingResponse {
        date: q.date,
        targets_defaulted: ctx.targets.defaulted,
        slots,
    }))
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let day = parse_date(&q.date).ok_or(ApiError::Validation {
        field: "date",
        message: format!("expected YYYY-MM-DD, got {:?}", q.date),
    })?;

    let ctx = services::day_context(&state, user_id, day).await?;
    let totals = services::daily_totals(&ctx.targets.macros, &ctx.meals);

    Ok(Json(SummaryResponse {
        date: q.date,
        targets_defaulted: ctx.targets.defaulted,
        target: totals.target,
        consumed: totals.consumed,
        remaining: totals.target.sub(&totals.consumed).rounded(),
    }))
}
