//! NCBI genome-assembly crawling.
//!
//! Walks FTP-style directory listings from genome-directory URLs down to the
//! per-version `genomic.fna.gz` files and downloads them.

mod crawler;

pub use crawler::{read_genome_urls, AssemblyCrawler};
