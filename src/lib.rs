//! Bioinformatics data-wrangling toolkit
//!
//! - Submit gene lists to the KEGG "Reconstruct Pathway" tool and scrape the
//!   result list
//! - Crawl NCBI assembly directories and download `genomic.fna.gz` files
//! - Aggregate microbial abundance tables by category
//!
//! # Pathway mapper usage
//!
//! ```rust,ignore
//! use embl_tools::{MapRequest, MapperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = MapperService::new();
//!
//!     let request = MapRequest::new("genelist.txt", "genelist_out.csv")
//!         .with_headless(true);
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("Pathways mapped: {}", result.records.len());
//! }
//! ```
//!
//! # Abundance aggregation usage
//!
//! ```rust,ignore
//! use embl_tools::{tabular, AbundanceTable};
//!
//! fn main() {
//!     let table = tabular::load("microbial_data.xlsx".as_ref()).unwrap();
//!     let abundance = AbundanceTable::from_table(&table).unwrap();
//!
//!     let (contamination, plant) = abundance.aggregate_by_prefix("d__Archaea").unwrap();
//!     for (label, total) in contamination.iter() {
//!         println!("{label}: {total}");
//!     }
//! }
//! ```

pub mod abundance;
pub mod config;
pub mod error;
pub mod kegg;
pub mod ncbi;
pub mod service;
pub mod tabular;
pub mod traits;

// Re-export the main types.
pub use abundance::{aggregate, AbundanceTable, AggregateResult, SampleRow};
pub use config::MapperConfig;
pub use error::ToolsError;
pub use kegg::{KeggMapper, PathwayRecord};
pub use ncbi::AssemblyCrawler;
pub use service::{map_all, MapRequest, MapResult, MapperService};
pub use tabular::{Cell, Table};
pub use traits::Mapper;
