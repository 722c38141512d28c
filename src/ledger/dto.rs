use serde::{Deserialize, Serialize};

use crate::domain::{MacroSet, MealSlot};

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct SlotBudget {
    pub slot: MealSlot,
    #[serde(flatten)]
    pub remaining: MacroSet,
}

#[derive(Debug, Serialize)]
pub struct RemainingResponse {
    pub date: String,
    pub targets_defaulted: bool,
    pub slots: Vec<SlotBudget>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub date: String,
    pub targets_defaulted: bool,
    pub target: MacroSet,
    pub consumed: MacroSet,
    pub remaining: MacroSet,
}
