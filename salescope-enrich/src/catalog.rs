//! Product catalog client.
//!
//! The catalog is fetched once per run and treated as an immutable id ->
//! entry mapping from then on. Fetch failures are returned to the caller,
//! which degrades to an empty mapping — the pipeline itself never aborts
//! on catalog trouble.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use salescope_core::CatalogEntry;
use serde::Deserialize;

/// Response envelope returned by the catalog service.
#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<CatalogEntry>,
}

/// Fetch up to `limit` products from `{base_url}/products`.
pub async fn fetch_catalog(base_url: &str, limit: u32, timeout_secs: u64) -> Result<Vec<CatalogEntry>> {
    let url = format!("{}/products?limit={}", base_url.trim_end_matches('/'), limit);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("building http client")?;

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .context("catalog request rejected")?;

    let body: ProductsResponse = response
        .json()
        .await
        .context("decoding catalog response")?;
    Ok(body.products)
}

/// Index catalog entries by numeric id for the enrichment join.
pub fn build_catalog_map(entries: Vec<CatalogEntry>) -> HashMap<u64, CatalogEntry> {
    entries.into_iter().map(|e| (e.id, e)).collect()
}
