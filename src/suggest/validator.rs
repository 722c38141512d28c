use serde::Serialize;

use crate::domain::MacroSet;

/// Budget dimensions a candidate can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetDim {
    Calories,
    Protein,
    Carbs,
    Fat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub ok: bool,
    pub violations: Vec<BudgetDim>,
}

/// Zero-tolerance budget gate: a candidate fails on any dimension strictly
/// above the remaining budget. Equality passes; there is no epsilon. Pure
/// function of its two inputs — no clock, database or environment access.
pub fn validate(candidate: &MacroSet, budget: &MacroSet) -> Verdict {
    let mut violations = Vec::new();
    if candidate.calories > budget.calories {
        violations.push(BudgetDim::Calories);
    }
    if candidate.protein_g > budget.protein_g {
        violations.push(BudgetDim::Protein);
    }
    if candidate.carbs_g > budget.carbs_g {
        violations.push(BudgetDim::Carbs);
    }
    if candidate.fat_g > budget.fat_g {
        violations.push(BudgetDim::Fat);
    }
    Verdict {
        ok: violations.is_empty(),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget() -> MacroSet {
        MacroSet::new(500.0, 40.0, 50.0, 20.0)
    }

    #[test]
    fn within_budget_passes() {
        let candidate = MacroSet::new(450.0, 35.0, 40.0, 15.0);
        let v = validate(&candidate, &budget());
        assert!(v.ok);
        assert!(v.violations.is_empty());
    }

    #[test]
    fn equal_to_the_limit_passes() {
        let v = validate(&budget(), &budget());
        assert!(v.ok);
    }

    #[test]
    fn strictly_over_fails_with_no_epsilon() {
        let candidate = MacroSet::new(500.01, 40.0, 50.0, 20.0);
        let v = validate(&candidate, &budget());
        assert!(!v.ok);
        assert_eq!(v.violations, vec![BudgetDim::Calories]);
    }

    #[test]
    fn reports_every_violating_dimension() {
        let candidate = MacroSet::new(600.0, 45.0, 50.0, 25.0);
        let v = validate(&candidate, &budget());
        assert_eq!(
            v.violations,
            vec![BudgetDim::Calories, BudgetDim::Protein, BudgetDim::Fat]
        );
    }

    #[test]
    fn anything_nonnegative_fails_a_negative_budget_dimension() {
        let over_budget = MacroSet::new(200.0, -5.0, 30.0, 10.0);
        let candidate = MacroSet::new(100.0, 0.0, 20.0, 5.0);
        let v = validate(&candidate, &over_budget);
        assert!(!v.ok);
        assert_eq!(v.violations, vec![BudgetDim::Protein]);
    }

    #[test]
    fn same_inputs_same_verdict_regardless_of_order() {
        let a = MacroSet::new(300.0, 20.0, 30.0, 10.0);
        let b = budget();
        let first = validate(&a, &b);
        let _ = validate(&b, &a);
        let second = validate(&a, &b);
        assert_eq!(first, second);
    }
}
