pub mod combination;
pub mod constraint;
pub mod enumerator;
pub mod modes;
pub mod objective;
pub mod partition;
pub mod tracker;

use std::collections::{BTreeMap, HashSet};
use std::ops::Add;

use serde::Serialize;
use tracing::{debug, info};

use crate::data::catalog::Catalog;
use crate::data::item::{Attribute, Slot};
use crate::error::{ConfigError, SearchResult};
use crate::optimizer::combination::Combination;
use crate::optimizer::constraint::Constraint;
use crate::optimizer::enumerator::Enumerator;
use crate::optimizer::objective::Objective;
use crate::optimizer::partition::{partition, SlotGroup};
use crate::optimizer::tracker::BestSet;
use crate::parallel::{run_batches, WorkerPool};

pub use modes::SearchMode;

/// Number of batches the first slot's candidates are split into for parallel runs.
const PARALLEL_BATCH_COUNT: usize = 64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    #[default]
    Sequential,
    /// Split on the first slot and search the batches on a rayon pool.
    Parallel(WorkerPool),
}

/// Declared parameters of one search run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchConfig {
    /// Searched slots, outermost enumeration dimension first.
    pub slots: Vec<Slot>,
    /// Allow leaving non-fixed slots empty.
    pub allow_skip: bool,
    /// Fewest non-empty slots a combination may have. Only meaningful with `allow_skip`.
    pub min_occupied: usize,
    pub constraint: Constraint,
    pub objective: Objective,
    /// Drop expansion items before partitioning.
    pub base_content_only: bool,
    /// Drop individual items heavier than this before partitioning.
    pub max_item_cost: Option<f64>,
    /// Slots bound to one named item.
    pub fixed: BTreeMap<Slot, String>,
    pub execution: Execution,
}

impl SearchConfig {
    pub fn new(slots: Vec<Slot>, objective: Objective) -> Self {
        let min_occupied = slots.len();
        Self {
            slots,
            allow_skip: false,
            min_occupied,
            constraint: Constraint::default(),
            objective,
            base_content_only: false,
            max_item_cost: None,
            fixed: BTreeMap::new(),
            execution: Execution::Sequential,
        }
    }

    /// All four slots, every one mandatory.
    pub fn full_set(objective: Objective) -> Self {
        Self::new(Slot::ALL.to_vec(), objective)
    }

    pub fn with_min_threshold(mut self, attribute: Attribute, minimum: f64) -> Self {
        self.constraint = Constraint {
            attribute,
            minimum,
            ..self.constraint
        };
        self
    }

    pub fn with_max_total_cost(mut self, max_total_cost: f64) -> Self {
        self.constraint.max_total_cost = Some(max_total_cost);
        self
    }

    pub fn with_skipping(mut self, min_occupied: usize) -> Self {
        self.allow_skip = true;
        self.min_occupied = min_occupied;
        self
    }

    pub fn with_fixed(mut self, slot: Slot, name: impl Into<String>) -> Self {
        self.fixed.insert(slot, name.into());
        self
    }

    pub fn base_content_only(mut self) -> Self {
        self.base_content_only = true;
        self
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Occupancy floor handed to the enumerator.
    pub fn effective_min_occupied(&self) -> usize {
        if self.allow_skip {
            self.min_occupied
        } else {
            self.slots.len()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.is_empty() {
            return Err(ConfigError::EmptySlotList);
        }
        let mut seen = HashSet::new();
        for slot in &self.slots {
            if !seen.insert(*slot) {
                return Err(ConfigError::DuplicateSlot(*slot));
            }
        }
        if let Some(slot) = self.fixed.keys().find(|slot| !seen.contains(*slot)) {
            return Err(ConfigError::FixedSlotNotSearched(*slot));
        }
        if self.allow_skip && !(1..=self.slots.len()).contains(&self.min_occupied) {
            return Err(ConfigError::MinOccupiedOutOfRange {
                min: self.min_occupied,
                slots: self.slots.len(),
            });
        }
        check_bound("minimum", Some(self.constraint.minimum))?;
        check_bound("max_total_cost", self.constraint.max_total_cost)?;
        check_bound("max_item_cost", self.max_item_cost)?;
        Ok(())
    }
}

fn check_bound(field: &'static str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(ConfigError::InvalidBound { field, value })
        }
        _ => Ok(()),
    }
}

/// Counters for one run. `evaluated` counts combinations that passed the
/// constraint and received an objective value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub enumerated: u64,
    pub rejected: u64,
    pub excluded: u64,
    pub evaluated: u64,
}

impl Add for SearchStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            enumerated: self.enumerated + other.enumerated,
            rejected: self.rejected + other.rejected,
            excluded: self.excluded + other.excluded,
            evaluated: self.evaluated + other.evaluated,
        }
    }
}

/// Every combination tied for the optimum, plus the optimum itself.
/// Empty `combinations` means no feasible combination exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet<'a> {
    pub objective: Objective,
    pub best: Option<f64>,
    pub combinations: Vec<Combination<'a>>,
    pub stats: SearchStats,
}

impl ResultSet<'_> {
    pub fn is_feasible(&self) -> bool {
        !self.combinations.is_empty()
    }
}

/// Exhaustive search for the combinations that optimise `config.objective`.
///
/// Configuration problems (unknown fixed item, duplicate slots, bad bounds)
/// are returned before any combination is enumerated.
pub fn search<'a>(catalog: &'a Catalog, config: &SearchConfig) -> SearchResult<ResultSet<'a>> {
    config.validate()?;
    let groups = partition(catalog, config)?;
    let min_occupied = config.effective_min_occupied();

    let (best, stats) = match config.execution {
        Execution::Sequential => {
            let enumerator = Enumerator::new(&groups, min_occupied);
            scan(enumerator.iter(), config)
        }
        Execution::Parallel(pool) => scan_parallel(&groups, min_occupied, config, &pool)?,
    };

    let (best, combinations) = best.into_parts();
    info!(
        objective = %config.objective,
        best = ?best,
        ties = combinations.len(),
        enumerated = stats.enumerated,
        evaluated = stats.evaluated,
        "search complete"
    );
    Ok(ResultSet {
        objective: config.objective,
        best,
        combinations,
        stats,
    })
}

fn scan<'a>(
    combinations: impl Iterator<Item = Combination<'a>>,
    config: &SearchConfig,
) -> (BestSet<Combination<'a>>, SearchStats) {
    let direction = config.objective.direction();
    let mut best = BestSet::new();
    let mut stats = SearchStats::default();

    for combination in combinations {
        stats.enumerated += 1;
        if !config.constraint.admits(&combination) {
            stats.rejected += 1;
            continue;
        }
        let Some(value) = config.objective.evaluate(&combination) else {
            stats.excluded += 1;
            continue;
        };
        stats.evaluated += 1;
        best.offer(value, direction, move || combination);
    }

    (best, stats)
}

fn scan_parallel<'a>(
    groups: &[SlotGroup<'a>],
    min_occupied: usize,
    config: &SearchConfig,
    pool: &WorkerPool,
) -> SearchResult<(BestSet<Combination<'a>>, SearchStats)> {
    let outer = groups.first().map_or(0, SlotGroup::len);
    debug!(outer, workers = pool.workers, "parallel search");

    let partials = run_batches(outer, PARALLEL_BATCH_COUNT, pool, |start, end| {
        let enumerator = Enumerator::new(groups, min_occupied).with_outer_range(start..end);
        scan(enumerator.iter(), config)
    })?;

    let direction = config.objective.direction();
    Ok(partials.into_iter().fold(
        (BestSet::new(), SearchStats::default()),
        |(best, stats), (partial, partial_stats)| {
            (best.merge(partial, direction), stats + partial_stats)
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::item::Item;

    fn catalog() -> Catalog {
        Catalog::from_items(vec![
            Item::new("Helm A", Slot::Helm, 5.0, 20.0, 50.0),
            Item::new("Helm B", Slot::Helm, 3.0, 10.0, 30.0),
            Item::new("Chest A", Slot::Chest, 10.0, 35.0, 80.0),
        ])
    }

    #[test]
    fn validate_rejects_bad_configs() {
        let dup = SearchConfig::new(vec![Slot::Helm, Slot::Helm], Objective::MaximizeScore);
        assert_eq!(dup.validate(), Err(ConfigError::DuplicateSlot(Slot::Helm)));

        let empty = SearchConfig::new(Vec::new(), Objective::MaximizeScore);
        assert_eq!(empty.validate(), Err(ConfigError::EmptySlotList));

        let fixed = SearchConfig::new(vec![Slot::Helm], Objective::MaximizeScore)
            .with_fixed(Slot::Legs, "Greaves");
        assert_eq!(
            fixed.validate(),
            Err(ConfigError::FixedSlotNotSearched(Slot::Legs))
        );

        let occupancy = SearchConfig::full_set(Objective::MinimizeCost).with_skipping(5);
        assert!(matches!(
            occupancy.validate(),
            Err(ConfigError::MinOccupiedOutOfRange { min: 5, slots: 4 })
        ));

        let bound = SearchConfig::full_set(Objective::MinimizeCost).with_max_total_cost(-1.0);
        assert!(matches!(
            bound.validate(),
            Err(ConfigError::InvalidBound {
                field: "max_total_cost",
                ..
            })
        ));
    }

    #[test]
    fn stats_account_for_every_enumerated_combination() {
        let catalog = catalog();
        let config = SearchConfig::new(vec![Slot::Helm, Slot::Chest], Objective::MaximizeRatio)
            .with_min_threshold(Attribute::Threshold, 50.0);
        let result = search(&catalog, &config).unwrap();
        assert_eq!(result.stats.enumerated, 2);
        assert_eq!(result.stats.rejected, 1);
        assert_eq!(result.stats.evaluated, 1);
        assert_eq!(result.combinations[0].names(), vec!["Helm A", "Chest A"]);
    }

    #[test]
    fn empty_slot_yields_infeasible_result() {
        let catalog = catalog();
        let config = SearchConfig::full_set(Objective::MaximizeScore);
        let result = search(&catalog, &config).unwrap();
        assert!(!result.is_feasible());
        assert_eq!(result.best, None);
        assert_eq!(result.stats.enumerated, 0);
    }

    #[test]
    fn parallel_execution_matches_sequential() {
        let catalog = catalog();
        let config = SearchConfig::new(vec![Slot::Helm, Slot::Chest], Objective::MinimizeCost)
            .with_skipping(1);
        let sequential = search(&catalog, &config).unwrap();
        let parallel = search(
            &catalog,
            &config
                .clone()
                .with_execution(Execution::Parallel(WorkerPool::with_workers(2))),
        )
        .unwrap();
        assert_eq!(sequential, parallel);
    }
}
