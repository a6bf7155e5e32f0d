//! Admission rules and optional region/amount filtering.
//!
//! Validation and filtering are separate passes: every record is checked
//! against all six rules first, then the optional filters narrow the
//! admitted set in a fixed order (region, then minimum, then maximum).

use serde::Serialize;

use crate::transaction::Transaction;

/// How many rejected records keep their full reason list.
pub const FAILURE_SAMPLE_LIMIT: usize = 5;

/// Optional narrowing applied after validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    /// Exact, case-sensitive region match; `None` or empty means no filter
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl FilterParams {
    pub fn is_active(&self) -> bool {
        self.region.as_deref().is_some_and(|r| !r.is_empty())
            || self.min_amount.is_some()
            || self.max_amount.is_some()
    }
}

/// Counts for one validate-and-filter pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub filtered_by_region: usize,
    /// Min and max removals combined
    pub filtered_by_amount: usize,
    pub final_count: usize,
}

/// A rejected record with every rule it broke.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub transaction_id: String,
    pub reasons: Vec<String>,
}

#[derive(Debug)]
pub struct ValidationOutcome {
    pub admitted: Vec<Transaction>,
    pub invalid_count: usize,
    /// Reason detail for the first [`FAILURE_SAMPLE_LIMIT`] rejections
    pub failures: Vec<ValidationFailure>,
    pub summary: FilterSummary,
}

/// Evaluate all six admission rules independently, collecting every broken
/// rule. An empty result means the record is admitted.
fn broken_rules(t: &Transaction) -> Vec<String> {
    let mut reasons = Vec::new();

    let required = [
        ("TransactionID", t.transaction_id.as_str()),
        ("Date", t.date.as_str()),
        ("ProductID", t.product_id.as_str()),
        ("ProductName", t.product_name.as_str()),
        ("CustomerID", t.customer_id.as_str()),
        ("Region", t.region.as_str()),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            reasons.push(format!("Missing {name}"));
        }
    }

    if t.quantity <= 0 {
        reasons.push(format!("Invalid Quantity ({})", t.quantity));
    }
    if t.unit_price <= 0.0 {
        reasons.push(format!("Invalid UnitPrice ({})", t.unit_price));
    }
    if !t.transaction_id.starts_with('T') {
        reasons.push(format!("Invalid TransactionID format ({})", t.transaction_id));
    }
    if !t.product_id.starts_with('P') {
        reasons.push(format!("Invalid ProductID format ({})", t.product_id));
    }
    if !t.customer_id.starts_with('C') {
        reasons.push(format!("Invalid CustomerID format ({})", t.customer_id));
    }

    reasons
}

/// Validate transactions, then apply the optional filters to the admitted
/// set: region equality first, then `amount >= min`, then `amount <= max`
/// on the shrinking set. Rule evaluation itself never fails; a record
/// breaking several rules is rejected (and counted) once.
pub fn validate_and_filter(
    transactions: Vec<Transaction>,
    filter: &FilterParams,
) -> ValidationOutcome {
    let total_input = transactions.len();

    let mut admitted = Vec::with_capacity(total_input);
    let mut invalid_count = 0;
    let mut failures = Vec::new();

    for t in transactions {
        let reasons = broken_rules(&t);
        if reasons.is_empty() {
            admitted.push(t);
        } else {
            invalid_count += 1;
            if failures.len() < FAILURE_SAMPLE_LIMIT {
                failures.push(ValidationFailure {
                    transaction_id: t.transaction_id.clone(),
                    reasons,
                });
            }
        }
    }

    let mut filtered_by_region = 0;
    if let Some(region) = filter.region.as_deref().filter(|r| !r.is_empty()) {
        let before = admitted.len();
        admitted.retain(|t| t.region == region);
        filtered_by_region = before - admitted.len();
    }

    let mut filtered_by_amount = 0;
    if let Some(min) = filter.min_amount {
        let before = admitted.len();
        admitted.retain(|t| t.amount() >= min);
        filtered_by_amount += before - admitted.len();
    }
    if let Some(max) = filter.max_amount {
        let before = admitted.len();
        admitted.retain(|t| t.amount() <= max);
        filtered_by_amount += before - admitted.len();
    }

    let summary = FilterSummary {
        total_input,
        invalid: invalid_count,
        filtered_by_region,
        filtered_by_amount,
        final_count: admitted.len(),
    };

    ValidationOutcome {
        admitted,
        invalid_count,
        failures,
        summary,
    }
}
