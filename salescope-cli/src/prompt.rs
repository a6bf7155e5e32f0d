//! Interactive filter capture for `run --interactive`.

use anyhow::Result;
use salescope_core::FilterParams;
use std::io::{self, Write};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn confirm(label: &str) -> Result<bool> {
    loop {
        match prompt(label)?.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please answer y or n."),
        }
    }
}

/// Ask whether to filter, then capture region and amount bounds.
///
/// A region not present in the data warns and is skipped; an amount that
/// fails to parse warns and becomes "no bound". Neither is fatal.
pub fn ask_filters(regions: &[String], amount_range: Option<(f64, f64)>) -> Result<FilterParams> {
    println!("\nAvailable regions: {}", regions.join(", "));
    if let Some((min, max)) = amount_range {
        println!("Transaction amount range: {min:.2} - {max:.2}");
    }

    if !confirm("\nFilter the data before analysis? (y/n)")? {
        println!("No filters applied");
        return Ok(FilterParams::default());
    }

    let region_input = prompt("Region to keep (Enter to skip)")?;
    let region = if region_input.is_empty() {
        None
    } else if regions.iter().any(|r| *r == region_input) {
        Some(region_input)
    } else {
        println!("warning: region '{region_input}' not found in the data; skipping region filter");
        None
    };

    let min_amount = parse_bound(&prompt("Minimum amount (Enter to skip)")?, "minimum");
    let max_amount = parse_bound(&prompt("Maximum amount (Enter to skip)")?, "maximum");

    Ok(FilterParams {
        region,
        min_amount,
        max_amount,
    })
}

/// Empty input means no bound; unparseable input warns and means no bound.
fn parse_bound(raw: &str, which: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    match raw.replace(',', "").parse() {
        Ok(v) => Some(v),
        Err(_) => {
            println!("warning: invalid {which} amount '{raw}'; skipping");
            None
        }
    }
}
