use crate::domain::{MacroSet, MealSlot};

/// Prompt for one slot's recommendation request. The budget is stated as a
/// hard ceiling; the model's arithmetic is still never trusted — everything
/// it returns goes through the validator.
pub fn build_prompt(
    slot: MealSlot,
    budget: &MacroSet,
    restrictions: &[String],
    targets_defaulted: bool,
) -> String {
    let mut prompt = format!(
        "You are a nutrition assistant. Suggest exactly 3 {slot} meals \
         (1 primary, 2 alternatives) that fit the remaining budget below.\n\
         \n\
         Remaining budget for this meal:\n\
         - calories: {} kcal\n\
         - protein: {} g\n\
         - carbs: {} g\n\
         - fat: {} g\n\
         \n\
         HARD LIMIT: ALL values of every suggested meal must be less than or \
         equal to the meal limits above. No exceptions.\n",
        budget.calories, budget.protein_g, budget.carbs_g, budget.fat_g
    );

    if !restrictions.is_empty() {
        prompt.push_str(&format!(
            "\nDietary restrictions (must be respected): {}.\n",
            restrictions.join(", ")
        ));
    }
    if targets_defaulted {
        prompt.push_str(
            "\nThe user's targets are generic defaults (no profile data); \
             prefer broadly suitable meals.\n",
        );
    }

    prompt.push_str(
        "\nRespond with only a JSON object of the form:\n\
         {\"suggestions\": [{\"name\": \"...\", \"description\": \"...\", \
         \"calories\": 0, \"protein_g\": 0, \"carbs_g\": 0, \"fat_g\": 0, \
         \"ingredients\": [\"...\"], \"instructions\": \"...\"}]}\n\
         with exactly 3 entries and exact macro numbers.",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_states_budget_as_hard_ceiling() {
        let budget = MacroSet::new(500.0, 40.0, 50.0, 20.0);
        let p = build_prompt(MealSlot::Lunch, &budget, &[], false);
        assert!(p.contains("lunch"));
        assert!(p.contains("500 kcal"));
        assert!(p.contains("HARD LIMIT"));
        assert!(p.contains("No exceptions"));
        assert!(p.contains("exactly 3"));
    }

    #[test]
    fn prompt_carries_restrictions_and_default_note() {
        let budget = MacroSet::new(400.0, 30.0, 40.0, 15.0);
        let restrictions = vec!["vegetarian".to_string(), "no peanuts".to_string()];
        let p = build_prompt(MealSlot::Dinner, &budget, &restrictions, true);
        assert!(p.contains("vegetarian, no peanuts"));
        assert!(p.contains("generic defaults"));

        let q = build_prompt(MealSlot::Dinner, &budget, &[], false);
        assert!(!q.contains("Dietary restrictions"));
        assert!(!q.contains("generic defaults"));
    }
}
