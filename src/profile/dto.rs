use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::profile::repo::UserProfile;
use crate::profile::targets::DailyTargets;

#[derive(Debug, Deserialize)]
pub struct PutProfileRequest {
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TargetsDto {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub defaulted: bool,
}

impl From<DailyTargets> for TargetsDto {
    fn from(t: DailyTargets) -> Self {
        Self {
            calories: t.macros.calories,
            protein_g: t.macros.protein_g,
            carbs_g: t.macros.carbs_g,
            fat_g: t.macros.fat_g,
            defaulted: t.defaulted,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub updated_at: Option<OffsetDateTime>,
    pub targets: TargetsDto,
}

impl ProfileResponse {
    pub fn from_row(profile: Option<UserProfile>, targets: DailyTargets) -> Self {
        match profile {
            Some(p) => Self {
                sex: p.sex,
                age: p.age,
                height_cm: p.height_cm,
                weight_kg: p.weight_kg,
                activity_level: p.activity_level,
                goal: p.goal,
                dietary_restrictions: p.dietary_restrictions,
                updated_at: Some(p.updated_at),
                targets: targets.into(),
            },
            None => Self {
                sex: None,
                age: None,
                height_cm: None,
                weight_kg: None,
                activity_level: None,
                goal: None,
                dietary_restrictions: vec![],
                updated_at: None,
                targets: targets.into(),
            },
        }
    }
}
