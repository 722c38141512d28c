use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{LogMealRequest, LoggedMealResponse, MealsQuery};
use super::{repo, services};
use crate::auth::AuthUser;
use crate::domain::{parse_date, MacroSet};
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state, body))]
pub async fn log_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<LogMealRequest>,
) -> Result<(StatusCode, Json<LoggedMealResponse>), ApiError> {
    let day = parse_date(&body.date).ok_or(ApiError::Validation {
        field: "date",
        message: format!("expected YYYY-MM-DD, got {:?}", body.date),
    })?;
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation {
            field: "name",
            message: "must be non-empty".into(),
        });
    }
    let macros = MacroSet::new(body.calories, body.protein_g, body.carbs_g, body.fat_g);
    if !macros.is_finite()
        || macros.calories < 0.0
        || macros.protein_g < 0.0
        || macros.carbs_g < 0.0
        || macros.fat_g < 0.0
    {
        return Err(ApiError::Validation {
            field: "macros",
            message: "calories and macro grams must be finite and non-negative".into(),
        });
    }

    let meal = services::log_meal(&state, user_id, day, body.slot, body.name.trim(), macros).await?;
    Ok((StatusCode::CREATED, Json(meal.into())))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MealsQuery>,
) -> Result<Json<Vec<LoggedMealResponse>>, ApiError> {
    let day = parse_date(&q.date).ok_or(ApiError::Validation {
        field: "date",
        message: format!("expected YYYY-MM-DD, got {:?}", q.date),
    })?;
    let meals = repo::list_for_day(&state.db, user_id, day).await?;
    Ok(Json(meals.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    services::delete_meal(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
