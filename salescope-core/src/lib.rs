//! salescope-core: transaction model, validation/filtering, sales analytics,
//! and the catalog enrichment join. Pure and synchronous; no I/O.

pub mod analytics;
pub mod enrich;
pub mod transaction;
pub mod validate;

pub use analytics::{
    CustomerStats, DailyStats, PeakDay, ProductPerf, RegionSales, customer_stats, daily_trend,
    low_performers, peak_day, region_sales, top_products, total_revenue,
};
pub use enrich::{
    CatalogEntry, EnrichmentSummary, enrich_transactions, extract_numeric_id,
};
pub use transaction::{EnrichedTransaction, Transaction};
pub use validate::{
    FilterParams, FilterSummary, ValidationFailure, ValidationOutcome, validate_and_filter,
};
