//! salescope-enrich: product catalog HTTP client and flat-file writers for
//! enriched and cleaned transaction data.

pub mod catalog;
pub mod writer;

pub use catalog::{build_catalog_map, fetch_catalog};
pub use writer::{save_clean_csv, save_enriched};
