//! Core finance engine: document model, conversion, rollups, aggregation.

pub mod aggregate;
pub mod currency;
pub mod export;
pub mod model;
pub mod rollup;
pub mod totals;

// Re-export main types for cleaner imports
pub use aggregate::DashboardAggregator;
pub use model::{Expense, Invoice, ProjectRef, ProjectSnapshot, Quote};
pub use rollup::{CustomerTotals, ProjectRollup, Totals};
