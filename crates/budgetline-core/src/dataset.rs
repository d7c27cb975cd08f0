//! Tabular observation data and the row-wise bundle adjustment.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::BudgetLine;

/// Input columns the adjustment needs, in schema-report order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Subject",
    "Observation",
    "X",
    "Y",
    "X-intercept",
    "Y-intercept",
];

/// Columns appended to the output table, in output order.
pub const DERIVED_COLUMNS: [&str; 5] = [
    "X_old",
    "Y_old",
    "income_before",
    "income_after",
    "abs_delta",
];

/// A delimited-text table: one header row plus string cells.
///
/// Cells stay as text so that columns the adjustment does not touch survive
/// a read/adjust/write round-trip byte-for-byte.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Required columns absent from this table, in [`REQUIRED_COLUMNS`] order.
    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }
}

/// One or more required columns are missing from the input table.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required columns: {}", .missing.join(", "))]
pub struct SchemaError {
    pub missing: Vec<String>,
}

/// Aggregate statistics over one adjusted table.
///
/// Statistics are NaN for an empty table; row and clip counts are zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjustSummary {
    pub rows: usize,
    /// Rows whose projection fell off the segment and got clipped.
    pub clipped: usize,
    pub max_abs_delta: f64,
    pub mean_abs_delta: f64,
    pub income_after_min: f64,
    pub income_after_max: f64,
}

/// Output of [`adjust_dataset`]: the augmented table plus its statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjustedData {
    pub dataset: Dataset,
    pub summary: AdjustSummary,
}

/// Adjust every observation in `input` onto its budget line.
///
/// The output table has the same rows in the same order, with `X` and `Y`
/// replaced by the adjusted coordinates and [`DERIVED_COLUMNS`] appended.
/// Columns outside [`REQUIRED_COLUMNS`] pass through unchanged.
///
/// Fails before touching any row when a required column is missing. Value
/// ranges are not validated: cells that do not parse as numbers and
/// degenerate intercepts propagate as NaN or infinity into that row's
/// output instead of raising.
pub fn adjust_dataset(input: &Dataset) -> Result<AdjustedData, SchemaError> {
    let missing = input.missing_required();
    let (Some(x_col), Some(y_col), Some(xi_col), Some(yi_col)) = (
        input.column_index("X"),
        input.column_index("Y"),
        input.column_index("X-intercept"),
        input.column_index("Y-intercept"),
    ) else {
        return Err(SchemaError { missing });
    };
    if !missing.is_empty() {
        return Err(SchemaError { missing });
    }

    let mut headers = input.headers.clone();
    headers.extend(DERIVED_COLUMNS.iter().map(|name| name.to_string()));

    let mut rows = Vec::with_capacity(input.rows.len());
    let mut clipped = 0usize;
    let mut delta_sum = 0.0;
    let mut delta_max = f64::NEG_INFINITY;
    let mut income_min = f64::INFINITY;
    let mut income_max = f64::NEG_INFINITY;

    for row in &input.rows {
        let mut out = row.clone();
        // Ragged rows are padded so the numeric columns stay addressable.
        if out.len() < input.headers.len() {
            out.resize(input.headers.len(), String::new());
        }

        let x_old = out[x_col].clone();
        let y_old = out[y_col].clone();

        let bundle = Point2::new(parse_value(&x_old), parse_value(&y_old));
        let line = BudgetLine::new(parse_value(&out[xi_col]), parse_value(&out[yi_col]));
        let adjustment = line.snap(bundle);

        out[x_col] = format_value(adjustment.adjusted.x);
        out[y_col] = format_value(adjustment.adjusted.y);
        out.push(x_old);
        out.push(y_old);
        out.push(format_value(adjustment.income_before));
        out.push(format_value(adjustment.income_after));
        out.push(format_value(adjustment.abs_delta));
        rows.push(out);

        if adjustment.clipped {
            clipped += 1;
        }
        delta_sum += adjustment.abs_delta;
        delta_max = delta_max.max(adjustment.abs_delta);
        income_min = income_min.min(adjustment.income_after);
        income_max = income_max.max(adjustment.income_after);
    }

    let count = rows.len();
    log::debug!("clipped {clipped} of {count} bundles to segment endpoints");

    let summary = AdjustSummary {
        rows: count,
        clipped,
        max_abs_delta: if count > 0 { delta_max } else { f64::NAN },
        mean_abs_delta: if count > 0 {
            delta_sum / count as f64
        } else {
            f64::NAN
        },
        income_after_min: if count > 0 { income_min } else { f64::NAN },
        income_after_max: if count > 0 { income_max } else { f64::NAN },
    };

    Ok(AdjustedData {
        dataset: Dataset { headers, rows },
        summary,
    })
}

/// Parse one numeric cell; anything unparsable becomes NaN and flows
/// through the arithmetic untouched.
fn parse_value(cell: &str) -> f64 {
    cell.trim().parse().unwrap_or(f64::NAN)
}

/// Shortest text that parses back to the same `f64`.
fn format_value(value: f64) -> String {
    value.to_string()
}
