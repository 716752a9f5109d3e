use std::collections::HashMap;
use std::fmt;

use crate::data::catalog::Catalog;
use crate::data::item::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Sanity checks on a loaded catalog. The search itself assumes clean input;
/// this is what `poisefit validate` runs before trusting a new CSV.
pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen: HashMap<(Slot, &str), usize> = HashMap::new();

    for (index, item) in catalog.items().iter().enumerate() {
        let context = format!("row {} ({})", index + 1, item.name);
        if item.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "empty name");
        }
        for (label, value) in [
            ("weight", item.cost),
            ("poise", item.threshold),
            ("power", item.score),
        ] {
            if !value.is_finite() {
                report.push(ValidationSeverity::Error, &context, format!("{label} is not finite"));
            } else if value < 0.0 {
                report.push(
                    ValidationSeverity::Error,
                    &context,
                    format!("{label} is negative ({value})"),
                );
            }
        }
        if item.cost == 0.0 {
            report.push(
                ValidationSeverity::Info,
                &context,
                "zero weight; excluded from power/weight ratios",
            );
        }
        if let Some(first) = seen.insert((item.slot, item.name.as_str()), index) {
            report.push(
                ValidationSeverity::Warning,
                &context,
                format!("duplicate {} name, first seen at row {}", item.slot, first + 1),
            );
        }
    }

    for slot in Slot::ALL {
        if catalog.in_slot(slot).next().is_none() {
            report.push(
                ValidationSeverity::Warning,
                slot.as_str(),
                "no items; searches over this slot are infeasible",
            );
        }
    }

    report
}
