use serde::{Deserialize, Serialize};

use crate::domain::{MacroSet, MealSlot};

/// A candidate meal. Transient: becomes a logged meal only when the user
/// explicitly logs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
}

impl MealSuggestion {
    pub fn macros(&self) -> MacroSet {
        MacroSet::new(self.calories, self.protein_g, self.carbs_g, self.fat_g)
    }

    /// Shape check applied to parsed AI output before any budget logic.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty()
            && self.macros().is_finite()
            && self.calories >= 0.0
            && self.protein_g >= 0.0
            && self.carbs_g >= 0.0
            && self.fat_g >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Ai,
    Fallback,
    Mixed,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub meal_type: MealSlot,
    pub date: String,
}

/// One primary and two alternatives, every member validated against the
/// slot budget at generation time. `zero_budget` marks the short-circuit
/// result for a slot with no calories left.
#[derive(Debug, Serialize)]
pub struct RecommendationSet {
    pub slot: MealSlot,
    pub primary: Option<MealSuggestion>,
    pub alternatives: Vec<MealSuggestion>,
    pub zero_budget: bool,
    pub source: SuggestionSource,
    pub targets_defaulted: bool,
}

impl RecommendationSet {
    pub fn zero_budget(slot: MealSlot, targets_defaulted: bool) -> Self {
        Self {
            slot,
            primary: None,
            alternatives: vec![],
            zero_budget: true,
            source: SuggestionSource::Fallback,
            targets_defaulted,
        }
    }
}
