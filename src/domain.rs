use std::fmt;

use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};

/// Energy density constants used whenever a calorie figure is recomputed
/// from macro composition.
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Gram amounts are kept to this resolution at every mutation point; it is
/// also the tolerance for the post-swap conservation check.
pub const GRAM_UNIT: f64 = 0.01;

/// Ordered meal slots of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }

    pub fn parse(s: &str) -> Option<MealSlot> {
        match s {
            "breakfast" => Some(MealSlot::Breakfast),
            "lunch" => Some(MealSlot::Lunch),
            "dinner" => Some(MealSlot::Dinner),
            "snack" => Some(MealSlot::Snack),
            _ => None,
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Swappable macro category. Calories are not a category: a calorie swap
/// has no macro basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroCategory {
    Protein,
    Carbs,
    Fat,
}

impl MacroCategory {
    pub fn parse(s: &str) -> Option<MacroCategory> {
        match s {
            "protein" => Some(MacroCategory::Protein),
            "carbs" => Some(MacroCategory::Carbs),
            "fat" => Some(MacroCategory::Fat),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MacroCategory::Protein => "protein",
            MacroCategory::Carbs => "carbs",
            MacroCategory::Fat => "fat",
        }
    }
}

impl fmt::Display for MacroCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One calorie figure plus three macro gram figures. Used for targets,
/// consumption, remaining budgets and slot composition alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSet {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl MacroSet {
    pub fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    pub fn add(&self, other: &MacroSet) -> MacroSet {
        MacroSet {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            carbs_g: self.carbs_g + other.carbs_g,
            fat_g: self.fat_g + other.fat_g,
        }
    }

    pub fn sub(&self, other: &MacroSet) -> MacroSet {
        MacroSet {
            calories: self.calories - other.calories,
            protein_g: self.protein_g - other.protein_g,
            carbs_g: self.carbs_g - other.carbs_g,
            fat_g: self.fat_g - other.fat_g,
        }
    }

    pub fn scale(&self, factor: f64) -> MacroSet {
        MacroSet {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
        }
    }

    pub fn get(&self, category: MacroCategory) -> f64 {
        match category {
            MacroCategory::Protein => self.protein_g,
            MacroCategory::Carbs => self.carbs_g,
            MacroCategory::Fat => self.fat_g,
        }
    }

    pub fn set(&mut self, category: MacroCategory, grams: f64) {
        match category {
            MacroCategory::Protein => self.protein_g = grams,
            MacroCategory::Carbs => self.carbs_g = grams,
            MacroCategory::Fat => self.fat_g = grams,
        }
    }

    /// Grams to 0.01 g, calories to whole kcal.
    pub fn rounded(&self) -> MacroSet {
        MacroSet {
            calories: self.calories.round(),
            protein_g: round2(self.protein_g),
            carbs_g: round2(self.carbs_g),
            fat_g: round2(self.fat_g),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.calories.is_finite()
            && self.protein_g.is_finite()
            && self.carbs_g.is_finite()
            && self.fat_g.is_finite()
    }
}

/// kcal for a macro composition at 4/4/9 energy density.
pub fn kcal_from_macros(protein_g: f64, carbs_g: f64, fat_g: f64) -> f64 {
    protein_g * KCAL_PER_G_PROTEIN + carbs_g * KCAL_PER_G_CARBS + fat_g * KCAL_PER_G_FAT
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn floor2(v: f64) -> f64 {
    (v * 100.0).floor() / 100.0
}

/// Parses a `YYYY-MM-DD` query/body date.
pub fn parse_date(s: &str) -> Option<Date> {
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(s, &fmt).ok()
}
