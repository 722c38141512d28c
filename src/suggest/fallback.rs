use crate::domain::{floor2, kcal_from_macros, MacroSet};

use super::dto::MealSuggestion;

struct Template {
    name: &'static str,
    description: &'static str,
    ingredients: &'static [&'static str],
    instructions: &'static str,
}

/// Rotating names for synthesized suggestions. Macro values never come from
/// here — they are computed from the budget.
const TEMPLATES: [Template; 3] = [
    Template {
        name: "Grilled chicken bowl",
        description: "Lean grilled chicken over rice with steamed vegetables.",
        ingredients: &["chicken breast", "rice", "broccoli", "olive oil"],
        instructions: "Grill the chicken, cook the rice, steam the vegetables and assemble.",
    },
    Template {
        name: "Greek yogurt parfait",
        description: "Greek yogurt layered with oats and berries.",
        ingredients: &["greek yogurt", "rolled oats", "mixed berries", "honey"],
        instructions: "Layer yogurt, oats and berries in a glass; drizzle with honey.",
    },
    Template {
        name: "Tofu stir-fry",
        description: "Pan-seared tofu with mixed vegetables and noodles.",
        ingredients: &["firm tofu", "rice noodles", "bell pepper", "soy sauce"],
        instructions: "Sear the tofu, stir-fry the vegetables, toss with noodles and sauce.",
    },
];

/// Macro composition that fits inside `budget`, or None when no composition
/// can: a negative macro cap is unfittable (any non-negative gram amount
/// exceeds it), as is a non-positive calorie budget.
///
/// The caps are scaled uniformly so the 4/4/9 calorie envelope stays inside
/// the calorie budget; grams are floored to 0.01 g and calories floored to a
/// whole kcal, so every field is <= its cap by construction.
pub fn fit_macros(budget: &MacroSet) -> Option<MacroSet> {
    if budget.calories <= 0.0
        || budget.protein_g < 0.0
        || budget.carbs_g < 0.0
        || budget.fat_g < 0.0
    {
        return None;
    }

    let envelope = kcal_from_macros(budget.protein_g, budget.carbs_g, budget.fat_g);
    let scale = if envelope > 0.0 {
        (budget.calories / envelope).min(1.0)
    } else {
        0.0
    };

    let protein_g = floor2(budget.protein_g * scale);
    let carbs_g = floor2(budget.carbs_g * scale);
    let fat_g = floor2(budget.fat_g * scale);
    let calories = kcal_from_macros(protein_g, carbs_g, fat_g).floor();

    Some(MacroSet::new(calories, protein_g, carbs_g, fat_g))
}

/// Deterministic suggestions sized to the budget. `offset` rotates the
/// template used first, so AI-accepted suggestions and fillers do not
/// repeat names within one set.
pub fn synthesize(budget: &MacroSet, count: usize, offset: usize) -> Option<Vec<MealSuggestion>> {
    let macros = fit_macros(budget)?;
    let suggestions = (0..count)
        .map(|i| {
            let t = &TEMPLATES[(offset + i) % TEMPLATES.len()];
            MealSuggestion {
                name: t.name.to_string(),
                description: t.description.to_string(),
                calories: macros.calories,
                protein_g: macros.protein_g,
                carbs_g: macros.carbs_g,
                fat_g: macros.fat_g,
                ingredients: t.ingredients.iter().map(|s| s.to_string()).collect(),
                instructions: t.instructions.to_string(),
            }
        })
        .collect();
    Some(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::validator::validate;

    #[test]
    fn synthesized_macros_fit_the_budget() {
        let budgets = [
            MacroSet::new(500.0, 40.0, 50.0, 20.0),
            MacroSet::new(123.0, 7.77, 13.13, 3.33),
            MacroSet::new(2000.0, 0.0, 250.0, 0.0),
            MacroSet::new(1.0, 100.0, 100.0, 100.0),
        ];
        for budget in budgets {
            let m = fit_macros(&budget).expect("fittable budget");
            let v = validate(&m, &budget);
            assert!(v.ok, "{m:?} should fit {budget:?}: {:?}", v.violations);
        }
    }

    #[test]
    fn scaling_uses_the_whole_envelope_when_it_fits() {
        // 4*10 + 4*20 + 9*10 = 210 kcal < 500: no downscaling needed
        let budget = MacroSet::new(500.0, 10.0, 20.0, 10.0);
        let m = fit_macros(&budget).unwrap();
        assert_eq!(m.protein_g, 10.0);
        assert_eq!(m.carbs_g, 20.0);
        assert_eq!(m.fat_g, 10.0);
        assert_eq!(m.calories, 210.0);
    }

    #[test]
    fn unfittable_budgets_yield_none() {
        assert!(fit_macros(&MacroSet::new(0.0, 40.0, 50.0, 20.0)).is_none());
        assert!(fit_macros(&MacroSet::new(-100.0, 40.0, 50.0, 20.0)).is_none());
        // negative protein cap: no non-negative candidate can pass
        assert!(fit_macros(&MacroSet::new(300.0, -1.0, 50.0, 20.0)).is_none());
    }

    #[test]
    fn all_macro_caps_zero_gives_an_empty_meal() {
        let budget = MacroSet::new(100.0, 0.0, 0.0, 0.0);
        let m = fit_macros(&budget).unwrap();
        assert_eq!(m.calories, 0.0);
        assert!(validate(&m, &budget).ok);
    }

    #[test]
    fn synthesize_is_deterministic_and_rotates_names() {
        let budget = MacroSet::new(500.0, 40.0, 50.0, 20.0);
        let a = synthesize(&budget, 3, 0).unwrap();
        let b = synthesize(&budget, 3, 0).unwrap();
        assert_eq!(a.len(), 3);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.calories, y.calories);
        }
        // three distinct template names within one set
        assert_ne!(a[0].name, a[1].name);
        assert_ne!(a[1].name, a[2].name);

        let shifted = synthesize(&budget, 1, 2).unwrap();
        assert_eq!(shifted[0].name, a[2].name);
    }
}
