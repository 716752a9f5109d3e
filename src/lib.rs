//! Exhaustive armor-set optimizer: picks at most one piece per slot so that
//! total poise meets a target while minimizing weight, maximizing power, or
//! maximizing power per unit of weight. Every combination tied for the
//! optimum is returned.

pub mod cli;
pub mod data;
pub mod error;
pub mod logging;
pub mod optimizer;
pub mod parallel;
pub mod report;

pub use data::catalog::{load_catalog, read_catalog, Catalog};
pub use data::item::{Attribute, Item, Origin, Slot};
pub use error::{CatalogError, ConfigError, SearchError};
pub use optimizer::constraint::Constraint;
pub use optimizer::objective::Objective;
pub use optimizer::{search, Execution, ResultSet, SearchConfig, SearchMode, SearchStats};
