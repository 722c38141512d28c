use crate::domain::{kcal_from_macros, round2, MacroCategory, MacroSet, GRAM_UNIT};

/// Source slot lacks the requested amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shortfall {
    pub available_g: f64,
}

/// Move `amount_g` of one macro category between two slot compositions.
/// Grams are moved, never created or destroyed; both slots' calorie figures
/// are re-derived from their post-swap macro composition at 4/4/9 kcal/g,
/// so the slot-level figures stay consistent with what the slots now hold.
pub fn apply_swap(
    from: &MacroSet,
    to: &MacroSet,
    category: MacroCategory,
    amount_g: f64,
) -> Result<(MacroSet, MacroSet), Shortfall> {
    let available = from.get(category);
    if available < amount_g {
        return Err(Shortfall {
            available_g: round2(available),
        });
    }

    let mut new_from = *from;
    let mut new_to = *to;
    new_from.set(category, round2(available - amount_g));
    new_to.set(category, round2(to.get(category) + amount_g));

    new_from.calories =
        kcal_from_macros(new_from.protein_g, new_from.carbs_g, new_from.fat_g).round();
    new_to.calories = kcal_from_macros(new_to.protein_g, new_to.carbs_g, new_to.fat_g).round();

    Ok((new_from, new_to))
}

pub fn macro_sums(slots: &[MacroSet]) -> (f64, f64, f64) {
    slots.iter().fold((0.0, 0.0, 0.0), |(p, c, f), m| {
        (p + m.protein_g, c + m.carbs_g, f + m.fat_g)
    })
}

/// Day-level macro sums must survive a swap to within the gram resolution.
pub fn conserves(pre: (f64, f64, f64), post: (f64, f64, f64)) -> bool {
    (pre.0 - post.0).abs() <= GRAM_UNIT
        && (pre.1 - post.1).abs() <= GRAM_UNIT
        && (pre.2 - post.2).abs() <= GRAM_UNIT
}
