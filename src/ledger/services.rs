use time::Date;
use uuid::Uuid;

use crate::config::AllocationConfig;
use crate::domain::{MacroSet, MealSlot};
use crate::error::ApiError;
use crate::meals::repo::{self as meals_repo, LoggedMeal};
use crate::profile::repo as profile_repo;
use crate::profile::targets::{derive_targets, DailyTargets};
use crate::state::AppState;

/// Per-slot targets. Breakfast/lunch/dinner take their configured share of
/// the daily targets; snack takes the exact remainder, so the four slots
/// always sum to the day.
pub fn slot_targets(alloc: &AllocationConfig, daily: &MacroSet) -> [(MealSlot, MacroSet); 4] {
    let breakfast = daily.scale(alloc.pct(MealSlot::Breakfast) / 100.0).rounded();
    let lunch = daily.scale(alloc.pct(MealSlot::Lunch) / 100.0).rounded();
    let dinner = daily.scale(alloc.pct(MealSlot::Dinner) / 100.0).rounded();
    let snack = daily
        .sub(&breakfast)
        .sub(&lunch)
        .sub(&dinner)
        .rounded();
    [
        (MealSlot::Breakfast, breakfast),
        (MealSlot::Lunch, lunch),
        (MealSlot::Dinner, dinner),
        (MealSlot::Snack, snack),
    ]
}

pub fn slot_target(alloc: &AllocationConfig, daily: &MacroSet, slot: MealSlot) -> MacroSet {
    slot_targets(alloc, daily)
        .into_iter()
        .find(|(s, _)| *s == slot)
        .map(|(_, t)| t)
        .unwrap_or_default()
}

pub fn consumed_for_slot(meals: &[LoggedMeal], slot: MealSlot) -> MacroSet {
    meals
        .iter()
        .filter(|m| m.slot == slot)
        .fold(MacroSet::default(), |acc, m| acc.add(&m.macros))
}

/// Target minus consumed, component-wise. Negative values are meaningful
/// (the user is over budget) and are never clamped.
pub fn remaining_for_slot(
    alloc: &AllocationConfig,
    daily: &MacroSet,
    meals: &[LoggedMeal],
    slot: MealSlot,
) -> MacroSet {
    let target = slot_target(alloc, daily, slot);
    let consumed = consumed_for_slot(meals, slot);
    target.sub(&consumed).rounded()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTotals {
    pub target: MacroSet,
    pub consumed: MacroSet,
}

pub fn daily_totals(daily: &MacroSet, meals: &[LoggedMeal]) -> DayTotals {
    let consumed = meals
        .iter()
        .fold(MacroSet::default(), |acc, m| acc.add(&m.macros))
        .rounded();
    DayTotals {
        target: *daily,
        consumed,
    }
}

#[derive(Debug, Clone)]
pub struct DayContext {
    pub targets: DailyTargets,
    pub meals: Vec<LoggedMeal>,
    pub restrictions: Vec<String>,
}

/// Targets, logged meals and dietary restrictions for one user-day, fetched
/// fresh. Consumption is always recomputed from the raw log, never from a
/// denormalized snapshot.
pub async fn day_context(state: &AppState, user_id: Uuid, day: Date) -> Result<DayContext, ApiError> {
    let profile = profile_repo::get_by_user(&state.db, user_id).await?;
    let targets = derive_targets(profile.as_ref());
    let restrictions = profile.map(|p| p.dietary_restrictions).unwrap_or_default();
    let meals = meals_repo::list_for_day(&state.db, user_id, day).await?;
    Ok(DayContext {
        targets,
        meals,
        restrictions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;

    fn meal(slot: MealSlot, calories: f64, p: f64, c: f64, f: f64) -> LoggedMeal {
        LoggedMeal {
            id: Uuid::new_v4(),
            day: date!(2024 - 03 - 01),
            slot,
            name: "test".into(),
            macros: MacroSet::new(calories, p, c, f),
            logged_at: OffsetDateTime::now_utc(),
        }
    }

    fn default_alloc() -> AllocationConfig {
        AllocationConfig::default()
    }

    #[test]
    fn slot_targets_sum_exactly_to_daily() {
        let daily = MacroSet::new(2137.0, 131.7, 240.33, 71.9);
        let slots = slot_targets(&default_alloc(), &daily);
        let sum = slots
            .iter()
            .fold(MacroSet::default(), |acc, (_, t)| acc.add(t));
        assert!((sum.calories - daily.calories).abs() < 1e-9);
        assert!((sum.protein_g - daily.protein_g).abs() < 1e-9);
        assert!((sum.carbs_g - daily.carbs_g).abs() < 1e-9);
        assert!((sum.fat_g - daily.fat_g).abs() < 1e-9);
    }

    #[test]
    fn slot_target_follows_configured_share() {
        let daily = MacroSet::new(2000.0, 100.0, 200.0, 80.0);
        let lunch = slot_target(&default_alloc(), &daily, MealSlot::Lunch);
        assert_eq!(lunch.calories, 700.0); // 35%
        assert_eq!(lunch.protein_g, 35.0);
    }

    #[test]
    fn remaining_preserves_negative_values() {
        let daily = MacroSet::new(2000.0, 100.0, 200.0, 80.0);
        // breakfast target is 500 kcal / 25 g protein; log more than that
        let meals = vec![meal(MealSlot::Breakfast, 650.0, 40.0, 10.0, 5.0)];
        let rem = remaining_for_slot(&default_alloc(), &daily, &meals, MealSlot::Breakfast);
        assert_eq!(rem.calories, -150.0);
        assert_eq!(rem.protein_g, -15.0);
        assert!(rem.carbs_g > 0.0);
    }

    #[test]
    fn remaining_only_counts_the_requested_slot() {
        let daily = MacroSet::new(2000.0, 100.0, 200.0, 80.0);
        let meals = vec![
            meal(MealSlot::Breakfast, 300.0, 20.0, 30.0, 10.0),
            meal(MealSlot::Lunch, 400.0, 25.0, 40.0, 12.0),
        ];
        let rem = remaining_for_slot(&default_alloc(), &daily, &meals, MealSlot::Breakfast);
        assert_eq!(rem.calories, 200.0);
        assert_eq!(rem.protein_g, 5.0);
    }

    #[test]
    fn remaining_is_idempotent_for_a_fixed_log_set() {
        let daily = MacroSet::new(1800.0, 120.0, 180.0, 60.0);
        let meals = vec![meal(MealSlot::Dinner, 321.5, 21.25, 33.33, 9.99)];
        let a = remaining_for_slot(&default_alloc(), &daily, &meals, MealSlot::Dinner);
        let b = remaining_for_slot(&default_alloc(), &daily, &meals, MealSlot::Dinner);
        assert_eq!(a, b);
    }

    #[test]
    fn daily_totals_aggregate_all_slots() {
        let daily = MacroSet::new(2000.0, 100.0, 200.0, 80.0);
        let meals = vec![
            meal(MealSlot::Breakfast, 300.0, 20.0, 30.0, 10.0),
            meal(MealSlot::Snack, 150.0, 5.0, 20.0, 6.0),
        ];
        let totals = daily_totals(&daily, &meals);
        assert_eq!(totals.consumed.calories, 450.0);
        assert_eq!(totals.consumed.protein_g, 25.0);
        assert_eq!(totals.target, daily);
    }
}
