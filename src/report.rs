//! Console and JSON rendering of a search result.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

use crate::data::item::Slot;
use crate::optimizer::combination::Combination;
use crate::optimizer::objective::Objective;
use crate::optimizer::{ResultSet, SearchStats};

#[derive(Debug, Clone, Serialize)]
pub struct PieceView<'a> {
    pub slot: Slot,
    pub name: &'a str,
    pub weight: f64,
    pub poise: f64,
    pub power: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CombinationView<'a> {
    pub pieces: Vec<PieceView<'a>>,
    pub total_weight: f64,
    pub total_poise: f64,
    pub total_power: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

impl<'a> From<&Combination<'a>> for CombinationView<'a> {
    fn from(combination: &Combination<'a>) -> Self {
        Self {
            pieces: combination
                .items()
                .map(|item| PieceView {
                    slot: item.slot,
                    name: &item.name,
                    weight: item.cost,
                    poise: item.threshold,
                    power: item.score,
                })
                .collect(),
            total_weight: combination.total_cost,
            total_poise: combination.total_threshold,
            total_power: combination.total_score,
            ratio: Objective::MaximizeRatio.evaluate(combination),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultReport<'a> {
    pub label: String,
    pub objective: Objective,
    pub best: Option<f64>,
    pub elapsed_ms: f64,
    pub stats: SearchStats,
    pub combinations: Vec<CombinationView<'a>>,
}

impl<'a> ResultReport<'a> {
    pub fn new(label: impl Into<String>, result: &ResultSet<'a>, elapsed: Duration) -> Self {
        Self {
            label: label.into(),
            objective: result.objective,
            best: result.best,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            stats: result.stats,
            combinations: result.combinations.iter().map(CombinationView::from).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let seconds = self.elapsed_ms / 1000.0;
        let Some(best) = self.best else {
            let _ = writeln!(
                out,
                "{}: no valid combination found in {seconds:.2} seconds.",
                self.label
            );
            return out;
        };

        let value = match self.objective {
            Objective::MinimizeCost => format!("weight {best:.2}"),
            Objective::MaximizeScore => format!("power {best:.2}"),
            Objective::MaximizeRatio => format!("power/weight {best:.4}"),
        };
        let _ = writeln!(
            out,
            "{}: {} best combination(s), {value}, in {seconds:.2} seconds ({} evaluated)",
            self.label,
            self.combinations.len(),
            self.stats.evaluated
        );
        for combination in &self.combinations {
            let _ = writeln!(out, "---");
            for piece in &combination.pieces {
                let _ = writeln!(
                    out,
                    "  - {}: {} (Weight: {}, Poise: {}, Power: {})",
                    piece.slot, piece.name, piece.weight, piece.poise, piece.power
                );
            }
            let _ = write!(
                out,
                "  Total Weight: {:.2}, Total Poise: {}, Total Power: {:.2}",
                combination.total_weight, combination.total_poise, combination.total_power
            );
            if let Some(ratio) = combination.ratio {
                let _ = write!(out, ", Power/Weight: {ratio:.4}");
            }
            out.push('\n');
        }
        out
    }
}
