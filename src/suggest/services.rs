use tracing::{debug, warn};

use super::backend::SuggestionBackend;
use super::dto::{MealSuggestion, RecommendationSet, SuggestionSource};
use super::{fallback, parse, prompt, validator};
use crate::domain::{MacroSet, MealSlot};
use crate::error::ApiError;

const SET_SIZE: usize = 3;

/// Produce one primary and two alternative suggestions for a slot, honoring
/// the remaining budget as a hard ceiling.
///
/// The backend is untrusted: its output is parsed defensively and every
/// candidate goes through the validator before it can appear in the result.
/// Backend failures are absorbed into the deterministic fallback path; the
/// caller always gets either a valid set or a typed budget error.
pub async fn build_recommendations(
    backend: &dyn SuggestionBackend,
    slot: MealSlot,
    budget: MacroSet,
    restrictions: &[String],
    targets_defaulted: bool,
) -> Result<RecommendationSet, ApiError> {
    // No calories left: answering would waste backend quota and cannot
    // produce a valid meal.
    if budget.calories <= 0.0 {
        debug!(%slot, calories = budget.calories, "zero budget, skipping backend");
        return Ok(RecommendationSet::zero_budget(slot, targets_defaulted));
    }

    let mut accepted: Vec<MealSuggestion> = Vec::with_capacity(SET_SIZE);

    let prompt = prompt::build_prompt(slot, &budget, restrictions, targets_defaulted);
    match backend.complete(&prompt).await {
        Ok(raw) => match parse::extract_suggestions(&raw) {
            Ok(parsed) => {
                for s in parsed.into_iter().take(SET_SIZE) {
                    let verdict = validator::validate(&s.macros(), &budget);
                    if verdict.ok {
                        accepted.push(s);
                    } else {
                        debug!(
                            name = %s.name,
                            violations = ?verdict.violations,
                            "discarding over-budget suggestion"
                        );
                    }
                }
            }
            Err(e) => warn!(error = %e, "unusable completion, falling back"),
        },
        Err(e) => warn!(error = %e, "suggestion backend unavailable, falling back"),
    }

    let ai_count = accepted.len();
    if ai_count < SET_SIZE {
        let fillers = fallback::synthesize(&budget, SET_SIZE - ai_count, ai_count)
            .ok_or(ApiError::InsufficientBudget)?;
        debug_assert!(fillers
            .iter()
            .all(|f| validator::validate(&f.macros(), &budget).ok));
        accepted.extend(fillers);
    }

    let source = match ai_count {
        0 => SuggestionSource::Fallback,
        n if n >= SET_SIZE => SuggestionSource::Ai,
        _ => SuggestionSource::Mixed,
    };

    let mut it = accepted.into_iter();
    Ok(RecommendationSet {
        slot,
        primary: it.next(),
        alternatives: it.collect(),
        zero_budget: false,
        source,
        targets_defaulted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::backend::FakeBackend;
    use crate::suggest::validator::validate;

    fn budget() -> MacroSet {
        MacroSet::new(500.0, 40.0, 50.0, 20.0)
    }

    fn assert_all_validate(set: &RecommendationSet, budget: &MacroSet) {
        let all: Vec<_> = set.primary.iter().chain(set.alternatives.iter()).collect();
        assert_eq!(all.len(), 3);
        for s in all {
            assert!(
                validate(&s.macros(), budget).ok,
                "{} must fit the budget",
                s.name
            );
        }
    }

    #[tokio::test]
    async fn zero_budget_short_circuits_without_backend_call() {
        let backend = FakeBackend::replying("should never be asked");
        let budget = MacroSet::new(0.0, 40.0, 50.0, 20.0);
        let set = build_recommendations(&backend, MealSlot::Lunch, budget, &[], false)
            .await
            .unwrap();
        assert!(set.zero_budget);
        assert!(set.primary.is_none());
        assert!(set.alternatives.is_empty());
        assert_eq!(backend.calls(), 0);

        let negative = MacroSet::new(-120.0, 40.0, 50.0, 20.0);
        let set = build_recommendations(&backend, MealSlot::Lunch, negative, &[], false)
            .await
            .unwrap();
        assert!(set.zero_budget);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn backend_failure_falls_back_deterministically() {
        let backend = FakeBackend::failing();
        let first = build_recommendations(&backend, MealSlot::Dinner, budget(), &[], false)
            .await
            .unwrap();
        let second = build_recommendations(&backend, MealSlot::Dinner, budget(), &[], false)
            .await
            .unwrap();
        assert_eq!(backend.calls(), 2);
        for set in [&first, &second] {
            assert_eq!(set.source, SuggestionSource::Fallback);
            assert!(!set.zero_budget);
            assert_all_validate(set, &budget());
        }
        assert_eq!(
            first.primary.as_ref().unwrap().calories,
            second.primary.as_ref().unwrap().calories
        );
    }

    #[tokio::test]
    async fn garbage_completion_falls_back() {
        let backend = FakeBackend::replying("Sorry, I can't help with meal plans.");
        let set = build_recommendations(&backend, MealSlot::Breakfast, budget(), &[], false)
            .await
            .unwrap();
        assert_eq!(set.source, SuggestionSource::Fallback);
        assert_all_validate(&set, &budget());
    }

    #[tokio::test]
    async fn over_budget_ai_suggestions_are_discarded() {
        // protein 45 > 40: every AI entry violates the budget
        let raw = r#"{"suggestions": [
            {"name": "a", "calories": 400, "protein_g": 45, "carbs_g": 30, "fat_g": 10},
            {"name": "b", "calories": 400, "protein_g": 45, "carbs_g": 30, "fat_g": 10},
            {"name": "c", "calories": 400, "protein_g": 45, "carbs_g": 30, "fat_g": 10}
        ]}"#;
        let backend = FakeBackend::replying(raw);
        let set = build_recommendations(&backend, MealSlot::Lunch, budget(), &[], false)
            .await
            .unwrap();
        assert_eq!(set.source, SuggestionSource::Fallback);
        assert_all_validate(&set, &budget());
    }

    #[tokio::test]
    async fn valid_ai_suggestions_are_kept_and_shortfall_is_filled() {
        // one valid entry, two over budget
        let raw = r#"{"suggestions": [
            {"name": "keeper", "calories": 400, "protein_g": 35, "carbs_g": 30, "fat_g": 10},
            {"name": "too-much", "calories": 900, "protein_g": 35, "carbs_g": 30, "fat_g": 10},
            {"name": "too-fat", "calories": 400, "protein_g": 35, "carbs_g": 30, "fat_g": 25}
        ]}"#;
        let backend = FakeBackend::replying(raw);
        let set = build_recommendations(&backend, MealSlot::Lunch, budget(), &[], false)
            .await
            .unwrap();
        assert_eq!(set.source, SuggestionSource::Mixed);
        assert_eq!(set.primary.as_ref().unwrap().name, "keeper");
        assert_all_validate(&set, &budget());
    }

    #[tokio::test]
    async fn fully_valid_ai_set_is_used_as_is() {
        let raw = r#"{"suggestions": [
            {"name": "a", "calories": 450, "protein_g": 38, "carbs_g": 45, "fat_g": 12},
            {"name": "b", "calories": 430, "protein_g": 33, "carbs_g": 40, "fat_g": 15},
            {"name": "c", "calories": 500, "protein_g": 40, "carbs_g": 50, "fat_g": 20}
        ]}"#;
        let backend = FakeBackend::replying(raw);
        let set = build_recommendations(&backend, MealSlot::Snack, budget(), &[], false)
            .await
            .unwrap();
        assert_eq!(set.source, SuggestionSource::Ai);
        assert_eq!(set.alternatives.len(), 2);
        assert_all_validate(&set, &budget());
    }

    #[tokio::test]
    async fn negative_macro_cap_yields_insufficient_budget() {
        // calories remain but protein is already over budget: nothing fits
        let backend = FakeBackend::failing();
        let impossible = MacroSet::new(300.0, -5.0, 50.0, 20.0);
        let err = build_recommendations(&backend, MealSlot::Dinner, impossible, &[], false)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InsufficientBudget));
    }
}
