use axum::{extract::State, Json};
use tracing::instrument;

use super::dto::{ProfileResponse, PutProfileRequest};
use super::repo;
use super::targets::{self, ActivityLevel, Goal, Sex};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = repo::get_by_user(&state.db, user_id).await?;
    let derived = targets::derive_targets(profile.as_ref());
    Ok(Json(ProfileResponse::from_row(profile, derived)))
}

#[instrument(skip(state, body))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<PutProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    validate(&body)?;

    let profile = repo::upsert(
        &state.db,
        user_id,
        body.sex.as_deref(),
        body.age,
        body.height_cm,
        body.weight_kg,
        body.activity_level.as_deref(),
        body.goal.as_deref(),
        &body.dietary_restrictions,
    )
    .await?;
    let derived = targets::derive_targets(Some(&profile));
    Ok(Json(ProfileResponse::from_row(Some(profile), derived)))
}

fn validate(body: &PutProfileRequest) -> Result<(), ApiError> {
    if let Some(sex) = body.sex.as_deref() {
        if Sex::parse(sex).is_none() {
            return Err(bad("sex", format!("unknown value {sex:?}")));
        }
    }
    if let Some(level) = body.activity_level.as_deref() {
        if ActivityLevel::parse(level).is_none() {
            return Err(bad("activity_level", format!("unknown value {level:?}")));
        }
    }
    if let Some(goal) = body.goal.as_deref() {
        if Goal::parse(goal).is_none() {
            return Err(bad("goal", format!("unknown value {goal:?}")));
        }
    }
    if let Some(age) = body.age {
        if !(1..=120).contains(&age) {
            return Err(bad("age", format!("{age} is out of range")));
        }
    }
    if let Some(h) = body.height_cm {
        if !h.is_finite() || !(50.0..=260.0).contains(&h) {
            return Err(bad("height_cm", format!("{h} is out of range")));
        }
    }
    if let Some(w) = body.weight_kg {
        if !w.is_finite() || !(20.0..=400.0).contains(&w) {
            return Err(bad("weight_kg", format!("{w} is out of range")));
        }
    }
    Ok(())
}

fn bad(field: &'static str, message: String) -> ApiError {
    ApiError::Validation { field, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_request() -> PutProfileRequest {
        PutProfileRequest {
            sex: None,
            age: None,
            height_cm: None,
            weight_kg: None,
            activity_level: None,
            goal: None,
            dietary_restrictions: vec![],
        }
    }

    #[test]
    fn partial_profile_is_accepted() {
        assert!(validate(&empty_request()).is_ok());
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let mut req = empty_request();
        req.goal = Some("shred".into());
        assert!(matches!(
            validate(&req),
            Err(ApiError::Validation { field: "goal", .. })
        ));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        let mut req = empty_request();
        req.weight_kg = Some(-3.0);
        assert!(validate(&req).is_err());
        let mut req = empty_request();
        req.age = Some(0);
        assert!(validate(&req).is_err());
    }
}
