//! Tabular source/sink layer.
//!
//! A [`Table`] is an ordered 2-D grid of dynamically-typed cells, read from
//! and written to flat spreadsheet files. The layer knows nothing about the
//! abundance convention; it only moves grids in and out of `{csv, xlsx}`.

mod loader;
mod table;
mod writer;

pub use loader::load;
pub use table::{merge, Cell, Table};
pub use writer::save;
