use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::MealSlot;
use crate::meals::repo::LoggedMeal;

#[derive(Debug, Deserialize)]
pub struct LogMealRequest {
    pub date: String,
    pub slot: MealSlot,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Deserialize)]
pub struct MealsQuery {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct LoggedMealResponse {
    pub id: Uuid,
    pub date: String,
    pub slot: MealSlot,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub logged_at: OffsetDateTime,
}

impl From<LoggedMeal> for LoggedMealResponse {
    fn from(m: LoggedMeal) -> Self {
        Self {
            id: m.id,
            date: m.day.to_string(),
            slot: m.slot,
            name: m.name,
            calories: m.macros.calories,
            protein_g: m.macros.protein_g,
            carbs_g: m.macros.carbs_g,
            fat_g: m.macros.fat_g,
            logged_at: m.logged_at,
        }
    }
}
