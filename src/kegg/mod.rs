//! KEGG "Reconstruct Pathway" scraping.
//!
//! Uploads a gene-list text file to the mapper, drives the form to the
//! result view and scrapes the result list into [`PathwayRecord`]s.

mod scraper;
mod types;
mod writer;

pub use scraper::{parse_results, KeggMapper};
pub use types::PathwayRecord;
pub use writer::save_records;
