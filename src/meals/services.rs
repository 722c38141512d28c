use anyhow::Context;
use time::Date;
use uuid::Uuid;

use super::repo;
use crate::domain::{MacroSet, MealSlot};
use crate::error::ApiError;
use crate::state::AppState;

/// Insert the log entry and fold its macros into the slot's planned
/// composition in one transaction, so a concurrent swap never sees half of
/// a log.
pub async fn log_meal(
    state: &AppState,
    user_id: Uuid,
    day: Date,
    slot: MealSlot,
    name: &str,
    macros: MacroSet,
) -> Result<repo::LoggedMeal, ApiError> {
    let macros = macros.rounded();
    let id = Uuid::new_v4();

    let mut tx = state.db.begin().await.context("begin tx")?;
    let logged_at = repo::insert_tx(&mut tx, user_id, id, day, slot, name, &macros).await?;
    repo::adjust_day_slot_tx(&mut tx, user_id, day, slot, &macros).await?;
    tx.commit().await.context("commit tx")?;

    Ok(repo::LoggedMeal {
        id,
        day,
        slot,
        name: name.to_string(),
        macros,
        logged_at,
    })
}

/// Delete a log entry and subtract its macros from the slot composition,
/// atomically. Missing or foreign meals are a 404.
pub async fn delete_meal(state: &AppState, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
    let Some(meal) = repo::get_by_id(&state.db, user_id, id).await? else {
        return Err(ApiError::NotFound);
    };

    let mut tx = state.db.begin().await.context("begin tx")?;
    let deleted = repo::delete_tx(&mut tx, user_id, id).await?;
    if !deleted {
        // raced another delete of the same meal
        return Err(ApiError::NotFound);
    }
    let negated = meal.macros.scale(-1.0);
    repo::adjust_day_slot_tx(&mut tx, user_id, meal.day, meal.slot, &negated).await?;
    tx.commit().await.context("commit tx")?;

    Ok(())
}
