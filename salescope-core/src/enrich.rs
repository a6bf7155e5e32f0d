//! Best-effort join of transactions against the product catalog.
//!
//! The join key is the first run of decimal digits inside `product_id`
//! (`P101` -> 101, `P5X` -> 5). Anything that goes wrong for a single
//! record — no digits, an id too large to represent, no catalog entry —
//! degrades that record to unmatched; enrichment never drops a record.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::transaction::{EnrichedTransaction, Transaction};

/// One product entry from the external catalog, keyed by numeric id.
/// The live API omits `brand` on some products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub rating: f64,
}

/// Match accounting for one enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichmentSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
}

impl EnrichmentSummary {
    /// Matched share as a percentage; 0 for an empty pass.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64 * 100.0
        }
    }
}

/// First maximal decimal-digit run in `product_id`, or `None` when there is
/// no digit or the run overflows `u64`.
pub fn extract_numeric_id(product_id: &str) -> Option<u64> {
    let digits = Regex::new(r"\d+").ok()?;
    first_digit_run(&digits, product_id)
}

fn first_digit_run(digits: &Regex, product_id: &str) -> Option<u64> {
    digits.find(product_id)?.as_str().parse().ok()
}

/// Join every transaction against the catalog map. Output cardinality
/// equals input cardinality exactly; an empty catalog (unavailable service
/// included) marks every record unmatched.
pub fn enrich_transactions(
    transactions: &[Transaction],
    catalog: &HashMap<u64, CatalogEntry>,
) -> (Vec<EnrichedTransaction>, EnrichmentSummary) {
    let digits = Regex::new(r"\d+").ok();

    let mut enriched = Vec::with_capacity(transactions.len());
    let mut matched = 0;
    for t in transactions {
        let entry = digits
            .as_ref()
            .and_then(|re| first_digit_run(re, &t.product_id))
            .and_then(|id| catalog.get(&id));

        match entry {
            Some(e) => {
                matched += 1;
                enriched.push(EnrichedTransaction {
                    transaction: t.clone(),
                    api_category: Some(e.category.clone()),
                    api_brand: e.brand.clone(),
                    api_rating: Some(e.rating),
                    api_match: true,
                });
            }
            None => enriched.push(EnrichedTransaction {
                transaction: t.clone(),
                api_category: None,
                api_brand: None,
                api_rating: None,
                api_match: false,
            }),
        }
    }

    let total = enriched.len();
    let summary = EnrichmentSummary {
        total,
        matched,
        unmatched: total - matched,
    };
    (enriched, summary)
}
