use anyhow::Context;
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::instrument;

use super::dto::{SwapRequestBody, SwapResponse, SwapStatusEntry, SwapStatusResponse};
use super::{repo, services};
use crate::auth::AuthUser;
use crate::domain::{parse_date, MacroCategory, MealSlot};
use crate::error::ApiError;
use crate::ledger::dto::DayQuery;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn post_swap(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SwapRequestBody>,
) -> Result<Json<SwapResponse>, ApiError> {
    let day = parse_date(&body.date).ok_or(ApiError::Validation {
        field: "date",
        message: format!("expected YYYY-MM-DD, got {:?}", body.date),
    })?;

    let resp = services::perform_swap(
        &state,
        user_id,
        day,
        body.from_slot,
        body.to_slot,
        body.category,
        body.amount_g,
    )
    .await?;
    Ok(Json(resp))
}

#[instrument(skip(state))]
pub async fn swap_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> Result<Json<SwapStatusResponse>, ApiError> {
    let day = parse_date(&q.date).ok_or(ApiError::Validation {
        field: "date",
        message: format!("expected YYYY-MM-DD, got {:?}", q.date),
    })?;

    let rows = repo::list_for_day(&state.db, user_id, day)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    let swaps = rows
        .into_iter()
        .map(|r| {
            Ok(SwapStatusEntry {
                id: r.id,
                from_slot: MealSlot::parse(&r.from_slot)
                    .with_context(|| format!("swap {} has unknown slot {:?}", r.id, r.from_slot))?,
                to_slot: MealSlot::parse(&r.to_slot)
                    .with_context(|| format!("swap {} has unknown slot {:?}", r.id, r.to_slot))?,
                category: MacroCategory::parse(&r.category).with_context(|| {
                    format!("swap {} has unknown category {:?}", r.id, r.category)
                })?,
                amount_g: r.amount_g,
                created_at: r.created_at,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Json(SwapStatusResponse {
        date: q.date,
        swap_count: swaps.len(),
        swaps,
    }))
}
