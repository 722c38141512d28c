use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{MacroCategory, MacroSet, MealSlot};

#[derive(Debug, Deserialize)]
pub struct SwapRequestBody {
    pub date: String,
    pub from_slot: MealSlot,
    pub to_slot: MealSlot,
    pub category: MacroCategory,
    pub amount_g: f64,
}

#[derive(Debug, Serialize)]
pub struct SlotState {
    pub slot: MealSlot,
    #[serde(flatten)]
    pub macros: MacroSet,
}

impl SlotState {
    pub fn new(slot: MealSlot, macros: MacroSet) -> Self {
        Self { slot, macros }
    }
}

#[derive(Debug, Serialize)]
pub struct SwapResponse {
    pub from: SlotState,
    pub to: SlotState,
}

#[derive(Debug, Serialize)]
pub struct SwapStatusEntry {
    pub id: Uuid,
    pub from_slot: MealSlot,
    pub to_slot: MealSlot,
    pub category: MacroCategory,
    pub amount_g: f64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct SwapStatusResponse {
    pub date: String,
    pub swap_count: usize,
    pub swaps: Vec<SwapStatusEntry>,
}
