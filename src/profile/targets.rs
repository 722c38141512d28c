use crate::domain::{MacroSet, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};
use crate::profile::repo::UserProfile;

/// Targets never go below this, whatever the deficit math says.
pub const MIN_DAILY_KCAL: f64 = 1200.0;

/// Share of daily calories allotted to fat; carbs take the remainder.
pub const FAT_KCAL_SHARE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn parse(s: &str) -> Option<Sex> {
        match s {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }

    /// Mifflin-St Jeor sex constant.
    fn bmr_offset(self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Very,
    Extra,
}

impl ActivityLevel {
    pub fn parse(s: &str) -> Option<ActivityLevel> {
        match s {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "very" => Some(ActivityLevel::Very),
            "extra" => Some(ActivityLevel::Extra),
            _ => None,
        }
    }

    fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Very => 1.725,
            ActivityLevel::Extra => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    pub fn parse(s: &str) -> Option<Goal> {
        match s {
            "lose" => Some(Goal::Lose),
            "maintain" => Some(Goal::Maintain),
            "gain" => Some(Goal::Gain),
            _ => None,
        }
    }

    fn kcal_adjustment(self) -> f64 {
        match self {
            Goal::Lose => -500.0,
            Goal::Maintain => 0.0,
            Goal::Gain => 300.0,
        }
    }

    fn protein_g_per_kg(self) -> f64 {
        match self {
            Goal::Lose => 2.0,
            Goal::Maintain => 1.6,
            Goal::Gain => 2.2,
        }
    }
}

/// A user's calorie/macro targets for one day. `defaulted` is true when the
/// profile was missing or incomplete and the generic defaults were used;
/// the flag travels down to the suggestion prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTargets {
    pub macros: MacroSet,
    pub defaulted: bool,
}

pub fn default_targets() -> DailyTargets {
    DailyTargets {
        macros: MacroSet::new(2000.0, 100.0, 250.0, 67.0),
        defaulted: true,
    }
}

/// Mifflin-St Jeor BMR, activity-scaled to TDEE, goal-adjusted, then split:
/// protein by g/kg bodyweight, fat as a fixed calorie share, carbs from the
/// calorie remainder. Any missing or unparseable field falls back to the
/// default targets with `defaulted = true`.
pub fn derive_targets(profile: Option<&UserProfile>) -> DailyTargets {
    let Some(p) = profile else {
        return default_targets();
    };
    let (Some(sex), Some(age), Some(height), Some(weight), Some(activity), Some(goal)) = (
        p.sex.as_deref().and_then(Sex::parse),
        p.age,
        p.height_cm,
        p.weight_kg,
        p.activity_level.as_deref().and_then(ActivityLevel::parse),
        p.goal.as_deref().and_then(Goal::parse),
    ) else {
        return default_targets();
    };

    let bmr = 10.0 * weight + 6.25 * height - 5.0 * f64::from(age) + sex.bmr_offset();
    let tdee = bmr * activity.factor();
    let calories = (tdee + goal.kcal_adjustment()).max(MIN_DAILY_KCAL);

    let protein_g = goal.protein_g_per_kg() * weight;
    let fat_kcal = calories * FAT_KCAL_SHARE;
    let fat_g = fat_kcal / KCAL_PER_G_FAT;
    let carbs_g = ((calories - protein_g * KCAL_PER_G_PROTEIN - fat_kcal) / KCAL_PER_G_CARBS).max(0.0);

    DailyTargets {
        macros: MacroSet::new(calories, protein_g, carbs_g, fat_g).rounded(),
        defaulted: false,
    }
}
