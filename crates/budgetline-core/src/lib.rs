//! Snap observed consumption bundles onto their reported budget lines.
//!
//! Experimental choice data is often recorded with rounding error, leaving
//! bundles slightly off the budget line they were chosen from. This crate
//! moves each bundle to the closest point on the feasible segment of its
//! line: the orthogonal projection when that projection is feasible, the
//! nearest segment endpoint otherwise. The implied income of every adjusted
//! bundle equals 1 up to floating-point rounding.

mod dataset;
mod line;
mod logger;

pub use dataset::{
    adjust_dataset, AdjustSummary, AdjustedData, Dataset, SchemaError, DERIVED_COLUMNS,
    REQUIRED_COLUMNS,
};
pub use line::{Adjustment, BudgetLine};
pub use logger::init_with_level;
