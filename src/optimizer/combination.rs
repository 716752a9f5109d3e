use serde::Serialize;

use crate::data::item::{round2, Attribute, Item, Slot};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pick<'a> {
    pub slot: Slot,
    pub item: Option<&'a Item>,
}

/// One candidate loadout: at most one item per searched slot, in slot order.
/// Totals are rounded to two decimals once, here, and every comparison
/// downstream uses these rounded values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combination<'a> {
    pub picks: Vec<Pick<'a>>,
    pub total_cost: f64,
    pub total_threshold: f64,
    pub total_score: f64,
}

impl<'a> Combination<'a> {
    pub fn new(picks: Vec<Pick<'a>>) -> Self {
        let (mut cost, mut threshold, mut score) = (0.0, 0.0, 0.0);
        for item in picks.iter().filter_map(|pick| pick.item) {
            cost += item.cost;
            threshold += item.threshold;
            score += item.score;
        }
        Self {
            picks,
            total_cost: round2(cost),
            total_threshold: round2(threshold),
            total_score: round2(score),
        }
    }

    pub fn total(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Cost => self.total_cost,
            Attribute::Threshold => self.total_threshold,
            Attribute::Score => self.total_score,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &'a Item> + '_ {
        self.picks.iter().filter_map(|pick| pick.item)
    }

    pub fn occupied(&self) -> usize {
        self.picks.iter().filter(|pick| pick.item.is_some()).count()
    }

    pub fn item_in(&self, slot: Slot) -> Option<&'a Item> {
        self.picks
            .iter()
            .find(|pick| pick.slot == slot)
            .and_then(|pick| pick.item)
    }

    /// Item names in slot order; `-` for an empty slot.
    pub fn names(&self) -> Vec<&'a str> {
        self.picks
            .iter()
            .map(|pick| pick.item.map_or("-", |item| item.name.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_skip_empty_picks_and_round() {
        let helm = Item::new("A", Slot::Helm, 0.1, 25.1, 10.005);
        let legs = Item::new("B", Slot::Legs, 0.2, 25.9, 10.0);
        let combo = Combination::new(vec![
            Pick { slot: Slot::Helm, item: Some(&helm) },
            Pick { slot: Slot::Chest, item: None },
            Pick { slot: Slot::Legs, item: Some(&legs) },
        ]);
        assert_eq!(combo.total_cost, 0.3);
        assert_eq!(combo.total_threshold, 51.0);
        assert_eq!(combo.occupied(), 2);
        assert_eq!(combo.names(), vec!["A", "-", "B"]);
        assert_eq!(combo.item_in(Slot::Legs).map(|i| i.name.as_str()), Some("B"));
        assert_eq!(combo.item_in(Slot::Chest), None);
    }
}
