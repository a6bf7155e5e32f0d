use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use salescope_core::{CatalogEntry, FilterParams, enrich_transactions, validate_and_filter};
use salescope_enrich::{build_catalog_map, fetch_catalog, save_clean_csv, save_enriched};
use salescope_ingest::{parse_lines, read_sales_lines};

mod config;
mod prompt;
mod report;

use config::Config;

/// How many skipped lines / invalid records get their own output line.
const DETAIL_LIMIT: usize = 5;

#[derive(Parser, Debug)]
#[command(
    name = "salescope",
    version,
    about = "Sales analytics pipeline: ingest, validate, aggregate, enrich, report"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline: read, validate, analyze, enrich, report
    Run {
        /// Input sales file (overrides salescope.toml)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Keep only this region (exact match)
        #[arg(long)]
        region: Option<String>,

        /// Keep only transactions with amount >= this bound
        #[arg(long)]
        min_amount: Option<f64>,

        /// Keep only transactions with amount <= this bound
        #[arg(long)]
        max_amount: Option<f64>,

        /// Prompt for filters instead of taking them from flags
        #[arg(long)]
        interactive: bool,

        /// Skip the catalog fetch; every record reports unmatched
        #[arg(long)]
        offline: bool,
    },

    /// Validate a sales file and write the admitted records as CSV
    Clean {
        /// Input sales file (overrides salescope.toml)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output CSV path
        #[arg(long, default_value = "cleaned_sales_data.csv")]
        output: PathBuf,
    },

    /// Fetch the product catalog and print a sample (connectivity check)
    Fetch {
        /// Max products to request (overrides salescope.toml)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Write a default salescope.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            input,
            region,
            min_amount,
            max_amount,
            interactive,
            offline,
        } => {
            let cfg = config::load_config()?;
            let filter = FilterParams {
                region,
                min_amount,
                max_amount,
            };
            run_pipeline(&cfg, input, filter, interactive, offline).await
        }

        Command::Clean { input, output } => {
            let cfg = config::load_config()?;
            run_clean(&cfg, input, &output)
        }

        Command::Fetch { limit } => {
            let cfg = config::load_config()?;
            run_fetch(&cfg, limit).await
        }

        Command::Init => config::init_config(),
    }
}

fn step(n: usize, total: usize, message: &str) {
    println!("[{n}/{total}] {message}");
}

fn report_skipped(skipped: &[salescope_ingest::LineError]) {
    for s in skipped.iter().take(DETAIL_LIMIT) {
        println!("  line {}: skipped ({})", s.line_number, s.error);
    }
    if skipped.len() > DETAIL_LIMIT {
        println!("  ... and {} more skipped lines", skipped.len() - DETAIL_LIMIT);
    }
}

async fn run_pipeline(
    cfg: &Config,
    input: Option<PathBuf>,
    mut filter: FilterParams,
    interactive: bool,
    offline: bool,
) -> Result<()> {
    const TOTAL: usize = 8;
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.data.input));

    println!("salescope — sales analytics pipeline\n");

    step(1, TOTAL, "Reading sales data...");
    let lines = read_sales_lines(&input)?;
    println!("  read {} record lines from {}", lines.len(), input.display());

    step(2, TOTAL, "Parsing and cleaning records...");
    let parsed = parse_lines(&lines);
    report_skipped(&parsed.skipped);
    println!(
        "  parsed {} transactions, skipped {}",
        parsed.transactions.len(),
        parsed.skipped.len()
    );
    if parsed.transactions.is_empty() {
        bail!("no parseable transactions in {}", input.display());
    }

    step(3, TOTAL, "Applying filters...");
    if interactive {
        let mut regions: Vec<String> = parsed
            .transactions
            .iter()
            .map(|t| t.region.clone())
            .filter(|r| !r.is_empty())
            .collect();
        regions.sort();
        regions.dedup();

        let range = parsed
            .transactions
            .iter()
            .map(|t| t.amount())
            .fold(None, |acc: Option<(f64, f64)>, a| match acc {
                None => Some((a, a)),
                Some((min, max)) => Some((min.min(a), max.max(a))),
            });
        filter = prompt::ask_filters(&regions, range)?;
    } else if !filter.is_active() {
        println!("  no filters requested");
    }

    step(4, TOTAL, "Validating transactions...");
    let outcome = validate_and_filter(parsed.transactions, &filter);
    for f in &outcome.failures {
        println!("  invalid: {} - {}", f.transaction_id, f.reasons.join(", "));
    }
    if outcome.invalid_count > outcome.failures.len() {
        println!(
            "  ... and {} more invalid records",
            outcome.invalid_count - outcome.failures.len()
        );
    }
    println!(
        "  valid: {} | invalid: {}",
        outcome.summary.total_input - outcome.invalid_count,
        outcome.invalid_count
    );
    if filter.is_active() {
        let s = &outcome.summary;
        println!(
            "  filters removed {} by region, {} by amount; {} remain",
            s.filtered_by_region, s.filtered_by_amount, s.final_count
        );
    }
    if outcome.admitted.is_empty() {
        bail!("no valid transactions after validation; nothing to analyze");
    }
    let admitted = outcome.admitted;

    step(5, TOTAL, "Analyzing sales data...");
    let revenue = salescope_core::total_revenue(&admitted);
    let regions = salescope_core::region_sales(&admitted);
    let customers = salescope_core::customer_stats(&admitted);
    let products = salescope_core::top_products(&admitted, 5);
    println!("  total revenue: {revenue:.2}");
    println!(
        "  regions: {} | customers: {} | top products: {}",
        regions.len(),
        customers.len(),
        products.len()
    );

    step(6, TOTAL, "Fetching product catalog...");
    let catalog = load_catalog(cfg, offline).await;
    println!("  catalog entries: {}", catalog.len());

    step(7, TOTAL, "Enriching transactions...");
    let (enriched, summary) = enrich_transactions(&admitted, &catalog);
    println!(
        "  matched {}/{} ({:.1}%)",
        summary.matched,
        summary.total,
        summary.match_rate()
    );

    step(8, TOTAL, "Writing outputs...");
    save_enriched(&cfg.data.enriched_output, &enriched)?;
    println!("  enriched data: {}", cfg.data.enriched_output);

    let rendered = report::render_report(&admitted, &enriched);
    write_report(&cfg.data.report_output, &rendered)?;
    println!("  report: {}", cfg.data.report_output);

    println!("\nDone. {} transactions processed.", admitted.len());
    Ok(())
}

/// Fetch the catalog unless offline; any failure degrades to the empty
/// mapping so the pipeline continues with every record unmatched.
async fn load_catalog(cfg: &Config, offline: bool) -> HashMap<u64, CatalogEntry> {
    if offline {
        println!("  offline mode; skipping catalog fetch");
        return HashMap::new();
    }
    match fetch_catalog(
        &cfg.catalog.base_url,
        cfg.catalog.limit,
        cfg.catalog.timeout_secs,
    )
    .await
    {
        Ok(entries) if entries.is_empty() => {
            println!("  warning: catalog returned no products; continuing unenriched");
            HashMap::new()
        }
        Ok(entries) => build_catalog_map(entries),
        Err(err) => {
            println!("  warning: catalog fetch failed ({err:#}); continuing unenriched");
            HashMap::new()
        }
    }
}

fn write_report(path: impl AsRef<Path>, rendered: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
    }
    fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))
}

fn run_clean(cfg: &Config, input: Option<PathBuf>, output: &Path) -> Result<()> {
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.data.input));

    let lines = read_sales_lines(&input)?;
    let parsed = parse_lines(&lines);
    report_skipped(&parsed.skipped);

    let total_parsed = parsed.transactions.len() + parsed.skipped.len();
    let outcome = validate_and_filter(parsed.transactions, &FilterParams::default());
    for f in &outcome.failures {
        println!("  invalid: {} - {}", f.transaction_id, f.reasons.join(", "));
    }

    save_clean_csv(output, &outcome.admitted)?;

    println!("Total records parsed: {total_parsed}");
    println!(
        "Invalid records removed: {}",
        outcome.invalid_count + parsed.skipped.len()
    );
    println!("Valid records after cleaning: {}", outcome.admitted.len());
    println!("Cleaned data saved to: {}", output.display());
    Ok(())
}

async fn run_fetch(cfg: &Config, limit: Option<u32>) -> Result<()> {
    let limit = limit.unwrap_or(cfg.catalog.limit);

    println!("Fetching up to {limit} products from {}...", cfg.catalog.base_url);
    let entries = fetch_catalog(&cfg.catalog.base_url, limit, cfg.catalog.timeout_secs)
        .await
        .context("catalog fetch failed")?;
    println!("Fetched {} products\n", entries.len());

    for e in entries.iter().take(5) {
        println!(
            "  #{:<4} {:<30} {:<20} {:<15} rating {:.2}",
            e.id,
            e.title,
            e.category,
            e.brand.as_deref().unwrap_or("-"),
            e.rating
        );
    }

    let mapping = build_catalog_map(entries);
    println!("\nMapping covers {} product ids", mapping.len());
    Ok(())
}
