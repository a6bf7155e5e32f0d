//! Text report assembly.
//!
//! Consumes the aggregate views and the enrichment results and renders the
//! multi-section sales report. All presentation decisions (formatting,
//! truncation, currency symbols) live here, not in the core.

use std::collections::BTreeSet;

use chrono::Local;
use salescope_core::{
    EnrichedTransaction, Transaction, customer_stats, daily_trend, low_performers, peak_day,
    region_sales, top_products, total_revenue,
};

const WIDTH: usize = 80;
const TOP_N: usize = 5;
const LOW_PERFORMER_THRESHOLD: i64 = 10;
/// Past this many days the trend table shows the first 10 and last 5 rows.
const TREND_ELISION_LIMIT: usize = 15;
const UNMATCHED_LIST_CAP: usize = 20;

fn rule(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

fn centered(text: &str) -> String {
    let pad = WIDTH.saturating_sub(text.len()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Format an amount as `₹1,545,000.50`.
fn money(v: f64) -> String {
    let s = format!("{:.2}", v.abs());
    let (int_part, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if v < 0.0 { "-" } else { "" };
    format!("₹{sign}{grouped}.{frac}")
}

/// Render the full report for an admitted transaction set and its enriched
/// counterpart.
pub fn render_report(transactions: &[Transaction], enriched: &[EnrichedTransaction]) -> String {
    let revenue = total_revenue(transactions);
    let regions = region_sales(transactions);
    let products = top_products(transactions, TOP_N);
    let customers = customer_stats(transactions);
    let trend = daily_trend(transactions);
    let peak = peak_day(transactions);
    let low = low_performers(transactions, LOW_PERFORMER_THRESHOLD);

    let mut dates: Vec<&str> = transactions.iter().map(|t| t.date.as_str()).collect();
    dates.sort_unstable();
    let date_range = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "N/A".to_string(),
    };

    let matched = enriched.iter().filter(|e| e.api_match).count();
    let match_rate = if enriched.is_empty() {
        0.0
    } else {
        matched as f64 / enriched.len() as f64 * 100.0
    };
    let unmatched_products: BTreeSet<&str> = enriched
        .iter()
        .filter(|e| !e.api_match)
        .map(|e| e.transaction.product_name.as_str())
        .collect();

    let mut out = String::new();

    // Header
    out.push_str(&rule('='));
    out.push('\n');
    out.push_str(&centered("SALES ANALYTICS REPORT"));
    out.push('\n');
    out.push_str(&centered(&format!(
        "Generated: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )));
    out.push('\n');
    out.push_str(&centered(&format!("Records Processed: {}", transactions.len())));
    out.push('\n');
    out.push_str(&rule('='));
    out.push_str("\n\n");

    // Overall summary
    out.push_str("OVERALL SUMMARY\n");
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&format!("Total Revenue:        {}\n", money(revenue)));
    out.push_str(&format!("Total Transactions:   {}\n", transactions.len()));
    let avg_order = if transactions.is_empty() {
        0.0
    } else {
        revenue / transactions.len() as f64
    };
    out.push_str(&format!("Average Order Value:  {}\n", money(avg_order)));
    out.push_str(&format!("Date Range:           {date_range}\n\n"));

    // Region-wise performance
    out.push_str("REGION-WISE PERFORMANCE\n");
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&format!(
        "{:<15} {:<20} {:<15} {:<15}\n",
        "Region", "Sales", "% of Total", "Transactions"
    ));
    out.push_str(&rule('-'));
    out.push('\n');
    for r in &regions {
        out.push_str(&format!(
            "{:<15} {:>18}  {:>6.2}%        {:<15}\n",
            r.region,
            money(r.total_sales),
            r.percentage,
            r.transaction_count
        ));
    }
    out.push('\n');

    // Top products
    out.push_str(&format!("TOP {TOP_N} PRODUCTS\n"));
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&format!(
        "{:<8} {:<35} {:<15} {:<20}\n",
        "Rank", "Product Name", "Quantity", "Revenue"
    ));
    out.push_str(&rule('-'));
    out.push('\n');
    for (rank, p) in products.iter().enumerate() {
        out.push_str(&format!(
            "{:<8} {:<35} {:<15} {:>18}\n",
            rank + 1,
            p.name,
            p.quantity,
            money(p.revenue)
        ));
    }
    out.push('\n');

    // Top customers
    out.push_str(&format!("TOP {TOP_N} CUSTOMERS\n"));
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&format!(
        "{:<8} {:<20} {:<20} {:<15}\n",
        "Rank", "Customer ID", "Total Spent", "Order Count"
    ));
    out.push_str(&rule('-'));
    out.push('\n');
    for (rank, c) in customers.iter().take(TOP_N).enumerate() {
        out.push_str(&format!(
            "{:<8} {:<20} {:>18}  {:<15}\n",
            rank + 1,
            c.customer_id,
            money(c.total_spent),
            c.purchase_count
        ));
    }
    out.push('\n');

    // Daily trend
    out.push_str("DAILY SALES TREND\n");
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&format!(
        "{:<15} {:<20} {:<15} {:<20}\n",
        "Date", "Revenue", "Transactions", "Unique Customers"
    ));
    out.push_str(&rule('-'));
    out.push('\n');
    let days: Vec<(&String, &salescope_core::DailyStats)> = trend.iter().collect();
    let elide = days.len() > TREND_ELISION_LIMIT;
    for (i, (date, stats)) in days.iter().enumerate() {
        if elide && i == 10 {
            out.push_str(&format!(
                "{:<15} {:<20} {:<15} {:<20}\n",
                "...", "...", "...", "..."
            ));
        }
        if elide && (10..days.len() - 5).contains(&i) {
            continue;
        }
        out.push_str(&format!(
            "{:<15} {:>18}  {:<15} {:<20}\n",
            date, money(stats.revenue), stats.transaction_count, stats.unique_customers
        ));
    }
    let avg_daily = if trend.is_empty() {
        0.0
    } else {
        revenue / trend.len() as f64
    };
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&format!(
        "Total Days: {}  |  Average Daily Revenue: {}\n\n",
        trend.len(),
        money(avg_daily)
    ));

    // Product performance analysis
    out.push_str("PRODUCT PERFORMANCE ANALYSIS\n");
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str("\nBest Selling Day:\n");
    match &peak {
        Some(p) => {
            out.push_str(&format!("  Date:         {}\n", p.date));
            out.push_str(&format!("  Revenue:      {}\n", money(p.revenue)));
            out.push_str(&format!("  Transactions: {}\n", p.transaction_count));
        }
        None => out.push_str("  No data available\n"),
    }

    out.push_str(&format!(
        "\nLow Performing Products (Quantity < {LOW_PERFORMER_THRESHOLD}):\n"
    ));
    if low.is_empty() {
        out.push_str("  No low performing products found.\n");
    } else {
        out.push_str(&format!(
            "  {:<30} {:<12} {:<15}\n",
            "Product", "Quantity", "Revenue"
        ));
        out.push_str(&format!("  {}\n", "-".repeat(60)));
        for p in low.iter().take(10) {
            out.push_str(&format!(
                "  {:<30} {:<12} {:>15}\n",
                p.name,
                p.quantity,
                money(p.revenue)
            ));
        }
        if low.len() > 10 {
            out.push_str(&format!("  ... and {} more products\n", low.len() - 10));
        }
    }

    out.push_str("\nAverage Transaction Value by Region:\n");
    for r in &regions {
        let avg = if r.transaction_count > 0 {
            r.total_sales / r.transaction_count as f64
        } else {
            0.0
        };
        out.push_str(&format!("  {:<15} {}\n", r.region, money(avg)));
    }
    out.push('\n');

    // Enrichment summary
    out.push_str("API ENRICHMENT SUMMARY\n");
    out.push_str(&rule('-'));
    out.push('\n');
    out.push_str(&format!(
        "Total Products Enriched:     {} out of {}\n",
        matched,
        enriched.len()
    ));
    out.push_str(&format!("Success Rate:                {match_rate:.2}%\n"));
    out.push_str(&format!(
        "\nProducts That Couldn't Be Enriched ({}):\n",
        unmatched_products.len()
    ));
    if unmatched_products.is_empty() {
        out.push_str("  All products successfully enriched!\n");
    } else {
        for (i, product) in unmatched_products.iter().enumerate() {
            if i == UNMATCHED_LIST_CAP {
                out.push_str(&format!(
                    "  ... and {} more products\n",
                    unmatched_products.len() - UNMATCHED_LIST_CAP
                ));
                break;
            }
            out.push_str(&format!("  {}. {}\n", i + 1, product));
        }
    }
    out.push('\n');

    // Footer
    out.push_str(&rule('='));
    out.push('\n');
    out.push_str(&centered("END OF REPORT"));
    out.push('\n');
    out.push_str(&rule('='));
    out.push('\n');

    out
}
