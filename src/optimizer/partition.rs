//! Slot partitioner: splits the catalog into one candidate group per searched slot.

use tracing::{debug, warn};

use crate::data::catalog::Catalog;
use crate::data::item::{Item, Slot};
use crate::error::ConfigError;
use crate::optimizer::SearchConfig;

/// Candidates for one slot. `None` is the "nothing equipped" sentinel and,
/// when present, is always the last entry.
#[derive(Debug, Clone)]
pub struct SlotGroup<'a> {
    pub slot: Slot,
    pub candidates: Vec<Option<&'a Item>>,
    pub fixed: bool,
}

impl<'a> SlotGroup<'a> {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of real items, excluding the skip sentinel.
    pub fn item_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_some()).count()
    }

    pub fn allows_skip(&self) -> bool {
        matches!(self.candidates.last(), Some(None))
    }
}

/// Build the candidate groups for `config.slots`, in that order.
///
/// A slot with no matching rows yields an empty group (the search then reports
/// infeasibility). A fixed slot becomes a singleton; if its item is not among
/// the slot's filtered rows the whole run is rejected.
pub fn partition<'a>(
    catalog: &'a Catalog,
    config: &SearchConfig,
) -> Result<Vec<SlotGroup<'a>>, ConfigError> {
    let mut groups = Vec::with_capacity(config.slots.len());

    for &slot in &config.slots {
        let mut pool: Vec<&Item> = catalog
            .in_slot(slot)
            .filter(|item| !(config.base_content_only && item.origin.is_expansion()))
            .filter(|item| config.max_item_cost.map_or(true, |cap| item.cost <= cap))
            .collect();

        let fixed = match config.fixed.get(&slot) {
            Some(name) => {
                let Some(item) = pool.iter().copied().find(|item| item.name == *name) else {
                    return Err(ConfigError::FixedItemNotFound {
                        slot,
                        name: name.clone(),
                    });
                };
                pool = vec![item];
                true
            }
            None => false,
        };

        if pool.is_empty() {
            warn!(%slot, "no catalog items for slot");
        }

        let mut candidates: Vec<Option<&Item>> = pool.into_iter().map(Some).collect();
        if config.allow_skip && !fixed {
            candidates.push(None);
        }
        debug!(%slot, candidates = candidates.len(), fixed, "slot group built");

        groups.push(SlotGroup {
            slot,
            candidates,
            fixed,
        });
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::item::Origin;
    use crate::optimizer::{Objective, SearchConfig};

    fn catalog() -> Catalog {
        Catalog::from_items(vec![
            Item::new("Iron Helmet", Slot::Helm, 4.8, 6.0, 50.0),
            Item::new("White Mask", Slot::Helm, 1.3, 0.0, 20.0),
            Item::new("Fire Helm", Slot::Helm, 6.0, 9.0, 70.0).with_origin(Origin::Expansion),
            Item::new("Tree Armor", Slot::Chest, 12.0, 20.0, 90.0),
        ])
    }

    fn config(slots: Vec<Slot>) -> SearchConfig {
        SearchConfig::new(slots, Objective::MaximizeScore)
    }

    #[test]
    fn groups_follow_slot_order_and_catalog_order() {
        let catalog = catalog();
        let groups = partition(&catalog, &config(vec![Slot::Chest, Slot::Helm])).unwrap();
        assert_eq!(groups[0].slot, Slot::Chest);
        assert_eq!(groups[0].len(), 1);
        let helm_names: Vec<_> = groups[1]
            .candidates
            .iter()
            .map(|c| c.map(|item| item.name.as_str()))
            .collect();
        assert_eq!(
            helm_names,
            vec![Some("Iron Helmet"), Some("White Mask"), Some("Fire Helm")]
        );
    }

    #[test]
    fn origin_filter_and_item_cap_apply_before_grouping() {
        let catalog = catalog();
        let mut cfg = config(vec![Slot::Helm]);
        cfg.base_content_only = true;
        cfg.max_item_cost = Some(5.0);
        let groups = partition(&catalog, &cfg).unwrap();
        assert_eq!(groups[0].item_count(), 2);
    }

    #[test]
    fn skip_sentinel_is_appended_except_on_fixed_slots() {
        let catalog = catalog();
        let mut cfg = config(vec![Slot::Helm, Slot::Chest]);
        cfg.allow_skip = true;
        cfg.min_occupied = 1;
        cfg.fixed = BTreeMap::from([(Slot::Chest, "Tree Armor".to_string())]);
        let groups = partition(&catalog, &cfg).unwrap();
        assert!(groups[0].allows_skip());
        assert_eq!(groups[0].len(), 4);
        assert!(groups[1].fixed);
        assert!(!groups[1].allows_skip());
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn missing_fixed_item_is_config_error() {
        let catalog = catalog();
        let mut cfg = config(vec![Slot::Helm]);
        cfg.fixed = BTreeMap::from([(Slot::Helm, "Tree Armor".to_string())]);
        let err = partition(&catalog, &cfg).unwrap_err();
        assert_eq!(
            err,
            ConfigError::FixedItemNotFound {
                slot: Slot::Helm,
                name: "Tree Armor".to_string()
            }
        );
    }

    #[test]
    fn empty_slot_is_not_an_error() {
        let catalog = catalog();
        let groups = partition(&catalog, &config(vec![Slot::Legs])).unwrap();
        assert!(groups[0].is_empty());
    }
}
