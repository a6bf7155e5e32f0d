//! Sales transaction types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// A parsed, type-coerced sales transaction.
///
/// Once a transaction has passed validation it satisfies all six admission
/// rules (non-empty fields, positive quantity and price, `T`/`P`/`C` id
/// prefixes), so `amount()` is always non-negative for admitted records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Starts with `T` for admitted records
    pub transaction_id: String,
    /// `YYYY-MM-DD`; kept as text and ordered lexicographically
    pub date: String,
    /// Starts with `P`; embeds the numeric id used for catalog lookup
    pub product_id: String,
    /// Commas are normalized to spaces at parse time
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    /// Starts with `C` for admitted records
    pub customer_id: String,
    pub region: String,
}

impl Transaction {
    /// Transaction value, recomputed from quantity and unit price.
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// A transaction joined against the product catalog.
///
/// Enrichment is one-to-one with its input: a record that found no catalog
/// entry keeps all three metadata fields `None` with `api_match` false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub api_category: Option<String>,
    pub api_brand: Option<String>,
    pub api_rating: Option<f64>,
    pub api_match: bool,
}
