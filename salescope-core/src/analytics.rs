//! Descriptive aggregates over the admitted transaction set.
//!
//! Every function here is pure: same input, same output, no hidden state.
//! Groups accumulate in first-seen order and every "sort by X descending"
//! uses a stable sort, so tie-break behavior is deterministic. Running sums
//! keep full precision; values are rounded to two decimals only when they
//! land in a result struct.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::transaction::Transaction;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Sum of `quantity * unit_price` across the set, rounded to two decimals.
/// Empty set yields 0.0.
pub fn total_revenue(transactions: &[Transaction]) -> f64 {
    round2(transactions.iter().map(|t| t.amount()).sum())
}

/// Per-region revenue share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSales {
    pub region: String,
    pub total_sales: f64,
    pub transaction_count: usize,
    /// Share of total revenue; 0 when total revenue is 0
    pub percentage: f64,
}

/// Group by region and sort by revenue descending. Ties keep first-seen
/// group order (stable sort over insertion-ordered groups).
pub fn region_sales(transactions: &[Transaction]) -> Vec<RegionSales> {
    if transactions.is_empty() {
        return Vec::new();
    }
    let total: f64 = transactions.iter().map(|t| t.amount()).sum();

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    for t in transactions {
        let i = match index.get(t.region.as_str()) {
            Some(&i) => i,
            None => {
                index.insert(t.region.as_str(), groups.len());
                groups.push((t.region.clone(), 0.0, 0));
                groups.len() - 1
            }
        };
        groups[i].1 += t.amount();
        groups[i].2 += 1;
    }

    let mut out: Vec<RegionSales> = groups
        .into_iter()
        .map(|(region, sales, count)| RegionSales {
            region,
            total_sales: round2(sales),
            transaction_count: count,
            percentage: if total > 0.0 {
                round2(sales / total * 100.0)
            } else {
                0.0
            },
        })
        .collect();
    out.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    out
}

/// Per-product quantity and revenue totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPerf {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

fn product_totals(transactions: &[Transaction]) -> Vec<ProductPerf> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, i64, f64)> = Vec::new();
    for t in transactions {
        let i = match index.get(t.product_name.as_str()) {
            Some(&i) => i,
            None => {
                index.insert(t.product_name.as_str(), groups.len());
                groups.push((t.product_name.clone(), 0, 0.0));
                groups.len() - 1
            }
        };
        groups[i].1 += t.quantity;
        groups[i].2 += t.amount();
    }
    groups
        .into_iter()
        .map(|(name, quantity, revenue)| ProductPerf {
            name,
            quantity,
            revenue: round2(revenue),
        })
        .collect()
}

/// Top `n` products by total quantity sold, descending. Ties keep
/// first-seen order.
pub fn top_products(transactions: &[Transaction], n: usize) -> Vec<ProductPerf> {
    let mut products = product_totals(transactions);
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    products.truncate(n);
    products
}

/// Products whose total quantity stayed under `threshold`, ascending by
/// quantity.
pub fn low_performers(transactions: &[Transaction], threshold: i64) -> Vec<ProductPerf> {
    let mut products = product_totals(transactions);
    products.retain(|p| p.quantity < threshold);
    products.sort_by(|a, b| a.quantity.cmp(&b.quantity));
    products
}

/// Per-customer purchase profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStats {
    pub customer_id: String,
    pub total_spent: f64,
    pub purchase_count: usize,
    pub avg_order_value: f64,
    /// Sorted, de-duplicated product names
    pub products_bought: Vec<String>,
}

/// Group by customer and sort by total spent descending. Ties keep
/// first-seen order.
pub fn customer_stats(transactions: &[Transaction]) -> Vec<CustomerStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, f64, usize, BTreeSet<String>)> = Vec::new();
    for t in transactions {
        let i = match index.get(t.customer_id.as_str()) {
            Some(&i) => i,
            None => {
                index.insert(t.customer_id.as_str(), groups.len());
                groups.push((t.customer_id.clone(), 0.0, 0, BTreeSet::new()));
                groups.len() - 1
            }
        };
        groups[i].1 += t.amount();
        groups[i].2 += 1;
        groups[i].3.insert(t.product_name.clone());
    }

    let mut out: Vec<CustomerStats> = groups
        .into_iter()
        .map(|(customer_id, spent, count, products)| CustomerStats {
            customer_id,
            total_spent: round2(spent),
            purchase_count: count,
            avg_order_value: if count > 0 {
                round2(spent / count as f64)
            } else {
                0.0
            },
            products_bought: products.into_iter().collect(),
        })
        .collect();
    out.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    out
}

/// One day of the sales trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub revenue: f64,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

/// Group by date key, ordered lexicographically (chronological for
/// `YYYY-MM-DD` dates).
pub fn daily_trend(transactions: &[Transaction]) -> BTreeMap<String, DailyStats> {
    let mut days: BTreeMap<&str, (f64, usize, HashSet<&str>)> = BTreeMap::new();
    for t in transactions {
        let day = days.entry(t.date.as_str()).or_default();
        day.0 += t.amount();
        day.1 += 1;
        day.2.insert(t.customer_id.as_str());
    }
    days.into_iter()
        .map(|(date, (revenue, count, customers))| {
            (
                date.to_string(),
                DailyStats {
                    revenue: round2(revenue),
                    transaction_count: count,
                    unique_customers: customers.len(),
                },
            )
        })
        .collect()
}

/// The highest-revenue day of the trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakDay {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
}

/// Maximum-revenue entry of [`daily_trend`]. Revenue ties go to the
/// earliest date: the trend iterates ascending and only a strictly greater
/// revenue displaces the current best. Empty set yields `None`.
pub fn peak_day(transactions: &[Transaction]) -> Option<PeakDay> {
    let mut best: Option<PeakDay> = None;
    for (date, stats) in daily_trend(transactions) {
        let beats = best.as_ref().is_none_or(|b| stats.revenue > b.revenue);
        if beats {
            best = Some(PeakDay {
                date,
                revenue: stats.revenue,
                transaction_count: stats.transaction_count,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(id: &str, date: &str, product: &str, qty: i64, price: f64, customer: &str, region: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            date: date.to_string(),
            product_id: "P101".to_string(),
            product_name: product.to_string(),
            quantity: qty,
            unit_price: price,
            customer_id: customer.to_string(),
            region: region.to_string(),
        }
    }

    fn sample_set() -> Vec<Transaction> {
        vec![
            txn("T001", "2024-12-01", "Laptop", 2, 45000.0, "C001", "North"),
            txn("T002", "2024-12-01", "Mouse", 10, 500.0, "C002", "South"),
            txn("T003", "2024-12-02", "Laptop", 1, 45000.0, "C001", "North"),
            txn("T004", "2024-12-02", "Keyboard", 4, 1500.0, "C003", "East"),
            txn("T005", "2024-12-03", "Mouse", 6, 500.0, "C002", "South"),
        ]
    }

    #[test]
    fn test_total_revenue() {
        // 90000 + 5000 + 45000 + 6000 + 3000
        assert_eq!(total_revenue(&sample_set()), 149000.0);
    }

    #[test]
    fn test_total_revenue_empty_set() {
        assert_eq!(total_revenue(&[]), 0.0);
    }

    #[test]
    fn test_region_sales_sorted_descending_and_percentages_sum() {
        let regions = region_sales(&sample_set());
        assert_eq!(regions[0].region, "North");
        assert_eq!(regions[0].total_sales, 135000.0);
        assert_eq!(regions[0].transaction_count, 2);
        for w in regions.windows(2) {
            assert!(w[0].total_sales >= w[1].total_sales);
        }
        let pct: f64 = regions.iter().map(|r| r.percentage).sum();
        assert!((pct - 100.0).abs() < 0.05, "percentages sum to {pct}");
    }

    #[test]
    fn test_region_sales_empty_set() {
        assert!(region_sales(&[]).is_empty());
    }

    #[test]
    fn test_region_tie_keeps_first_seen_order() {
        let set = vec![
            txn("T001", "2024-12-01", "Mouse", 1, 100.0, "C001", "West"),
            txn("T002", "2024-12-01", "Mouse", 1, 100.0, "C002", "East"),
        ];
        let regions = region_sales(&set);
        assert_eq!(regions[0].region, "West");
        assert_eq!(regions[1].region, "East");
    }

    #[test]
    fn test_top_products_bounded_and_ordered() {
        let top = top_products(&sample_set(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Mouse");
        assert_eq!(top[0].quantity, 16);
        assert_eq!(top[0].revenue, 8000.0);
        assert!(top[0].quantity >= top[1].quantity);
    }

    #[test]
    fn test_top_products_n_larger_than_set() {
        assert_eq!(top_products(&sample_set(), 50).len(), 3);
    }

    #[test]
    fn test_low_performers_strictly_under_threshold() {
        let low = low_performers(&sample_set(), 10);
        assert!(low.iter().all(|p| p.quantity < 10));
        for w in low.windows(2) {
            assert!(w[0].quantity <= w[1].quantity);
        }
        // Laptop (3) and Keyboard (4); Mouse (16) stays out
        assert_eq!(low.len(), 2);
        assert_eq!(low[0].name, "Laptop");
    }

    #[test]
    fn test_customer_stats_totals_and_products() {
        let customers = customer_stats(&sample_set());
        assert_eq!(customers[0].customer_id, "C001");
        assert_eq!(customers[0].total_spent, 135000.0);
        assert_eq!(customers[0].purchase_count, 2);
        assert_eq!(customers[0].avg_order_value, 67500.0);
        assert_eq!(customers[0].products_bought, vec!["Laptop".to_string()]);

        let c002 = customers.iter().find(|c| c.customer_id == "C002").unwrap();
        assert_eq!(c002.products_bought, vec!["Mouse".to_string()]);
    }

    #[test]
    fn test_customer_products_sorted_and_deduped() {
        let set = vec![
            txn("T001", "2024-12-01", "Mouse", 1, 100.0, "C001", "North"),
            txn("T002", "2024-12-01", "Laptop", 1, 100.0, "C001", "North"),
            txn("T003", "2024-12-02", "Mouse", 1, 100.0, "C001", "North"),
        ];
        let customers = customer_stats(&set);
        assert_eq!(
            customers[0].products_bought,
            vec!["Laptop".to_string(), "Mouse".to_string()]
        );
    }

    #[test]
    fn test_daily_trend_keys_ordered_with_unique_customers() {
        let trend = daily_trend(&sample_set());
        let dates: Vec<_> = trend.keys().cloned().collect();
        assert_eq!(dates, vec!["2024-12-01", "2024-12-02", "2024-12-03"]);

        let first = &trend["2024-12-01"];
        assert_eq!(first.revenue, 95000.0);
        assert_eq!(first.transaction_count, 2);
        assert_eq!(first.unique_customers, 2);
    }

    #[test]
    fn test_peak_day() {
        let peak = peak_day(&sample_set()).unwrap();
        assert_eq!(peak.date, "2024-12-01");
        assert_eq!(peak.revenue, 95000.0);
        assert_eq!(peak.transaction_count, 2);
    }

    #[test]
    fn test_peak_day_tie_goes_to_earliest_date() {
        let set = vec![
            txn("T001", "2024-12-02", "Mouse", 1, 100.0, "C001", "North"),
            txn("T002", "2024-12-01", "Mouse", 1, 100.0, "C002", "North"),
        ];
        assert_eq!(peak_day(&set).unwrap().date, "2024-12-01");
    }

    #[test]
    fn test_peak_day_empty_set() {
        assert_eq!(peak_day(&[]), None);
    }
}
