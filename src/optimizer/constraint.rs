//! Feasibility predicate applied before any objective work.

use serde::{Deserialize, Serialize};

use crate::data::item::Attribute;
use crate::optimizer::combination::Combination;

/// Minimum on one aggregated attribute, plus an optional cap on total cost.
/// Both bounds are inclusive: a total equal to the bound is feasible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub attribute: Attribute,
    pub minimum: f64,
    #[serde(default)]
    pub max_total_cost: Option<f64>,
}

impl Constraint {
    pub fn at_least(attribute: Attribute, minimum: f64) -> Self {
        Self {
            attribute,
            minimum,
            max_total_cost: None,
        }
    }

    pub fn with_max_total_cost(self, max_total_cost: Option<f64>) -> Self {
        Self {
            max_total_cost,
            ..self
        }
    }

    pub fn admits(&self, combination: &Combination<'_>) -> bool {
        if combination.total(self.attribute) < self.minimum {
            return false;
        }
        match self.max_total_cost {
            Some(cap) => combination.total_cost <= cap,
            None => true,
        }
    }
}

impl Default for Constraint {
    fn default() -> Self {
        Self::at_least(Attribute::Threshold, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::item::{Item, Slot};
    use crate::optimizer::combination::Pick;

    fn combo<'a>(items: &'a [Item]) -> Combination<'a> {
        Combination::new(
            items
                .iter()
                .map(|item| Pick {
                    slot: item.slot,
                    item: Some(item),
                })
                .collect(),
        )
    }

    #[test]
    fn minimum_is_inclusive_after_rounding() {
        let items = [
            Item::new("a", Slot::Helm, 1.0, 25.1, 0.0),
            Item::new("b", Slot::Legs, 1.0, 25.9, 0.0),
        ];
        let c = combo(&items);
        assert!(Constraint::at_least(Attribute::Threshold, 51.0).admits(&c));
        assert!(!Constraint::at_least(Attribute::Threshold, 51.01).admits(&c));
    }

    #[test]
    fn cost_cap_is_inclusive() {
        let items = [
            Item::new("a", Slot::Gauntlets, 10.3, 15.0, 0.0),
            Item::new("b", Slot::Legs, 10.3, 15.0, 0.0),
        ];
        let c = combo(&items);
        let constraint = Constraint::at_least(Attribute::Threshold, 30.0);
        assert!(constraint.with_max_total_cost(Some(20.6)).admits(&c));
        assert!(!constraint.with_max_total_cost(Some(20.5)).admits(&c));
    }

    #[test]
    fn constraint_can_target_other_attributes() {
        let items = [Item::new("a", Slot::Chest, 3.0, 0.0, 80.0)];
        let c = combo(&items);
        assert!(Constraint::at_least(Attribute::Score, 80.0).admits(&c));
        assert!(!Constraint::at_least(Attribute::Cost, 3.5).admits(&c));
    }
}
