//! Microbial abundance aggregation.
//!
//! Input convention: row 0 = contamination category per column, row 1 =
//! plant category per column, rows ≥ 2 = samples; column 0 = sample name,
//! columns ≥ 1 = numeric abundance values. Sample rows are filtered by a
//! name prefix, then each category view is summed column-wise and folded by
//! label.

mod aggregate;
mod table;

pub use aggregate::{aggregate, AggregateResult};
pub use table::{AbundanceTable, SampleRow};
