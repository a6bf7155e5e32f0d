//! Flat-file writers: the enriched pipe-delimited export and the cleaned
//! CSV export.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use salescope_core::{EnrichedTransaction, Transaction};

const ENRICHED_HEADER: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

const CLEAN_HEADER: [&str; 8] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
];

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Write enriched transactions as pipe-delimited text: one header line,
/// one line per record, missing metadata as empty fields, booleans as
/// `True`/`False`.
pub fn save_enriched(path: impl AsRef<Path>, enriched: &[EnrichedTransaction]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(csv::QuoteStyle::Never)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(ENRICHED_HEADER)?;
    for e in enriched {
        let t = &e.transaction;
        let record = [
            t.transaction_id.clone(),
            t.date.clone(),
            t.product_id.clone(),
            t.product_name.clone(),
            t.quantity.to_string(),
            t.unit_price.to_string(),
            t.customer_id.clone(),
            t.region.clone(),
            e.api_category.clone().unwrap_or_default(),
            e.api_brand.clone().unwrap_or_default(),
            e.api_rating.map(|r| r.to_string()).unwrap_or_default(),
            if e.api_match { "True" } else { "False" }.to_string(),
        ];
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))
}

/// Write admitted transactions as a comma-delimited CSV with the eight
/// canonical columns.
pub fn save_clean_csv(path: impl AsRef<Path>, transactions: &[Transaction]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(CLEAN_HEADER)?;
    for t in transactions {
        let record = [
            t.transaction_id.clone(),
            t.date.clone(),
            t.product_id.clone(),
            t.product_name.clone(),
            t.quantity.to_string(),
            t.unit_price.to_string(),
            t.customer_id.clone(),
            t.region.clone(),
        ];
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use salescope_core::Transaction;
    use std::path::PathBuf;

    fn txn() -> Transaction {
        Transaction {
            transaction_id: "T001".to_string(),
            date: "2024-12-01".to_string(),
            product_id: "P101".to_string(),
            product_name: "Laptop".to_string(),
            quantity: 2,
            unit_price: 45000.0,
            customer_id: "C001".to_string(),
            region: "North".to_string(),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("salescope-writer-{name}"))
    }

    #[test]
    fn test_enriched_file_layout() {
        let enriched = vec![
            EnrichedTransaction {
                transaction: txn(),
                api_category: Some("laptops".to_string()),
                api_brand: Some("Apple".to_string()),
                api_rating: Some(4.7),
                api_match: true,
            },
            EnrichedTransaction {
                transaction: txn(),
                api_category: None,
                api_brand: None,
                api_rating: None,
                api_match: false,
            },
        ];

        let path = temp_path("enriched.txt");
        save_enriched(&path, &enriched).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region|API_Category|API_Brand|API_Rating|API_Match"
        );
        assert_eq!(
            lines[1],
            "T001|2024-12-01|P101|Laptop|2|45000|C001|North|laptops|Apple|4.7|True"
        );
        assert_eq!(lines[2], "T001|2024-12-01|P101|Laptop|2|45000|C001|North||||False");
    }

    #[test]
    fn test_clean_csv_layout() {
        let path = temp_path("clean.csv");
        save_clean_csv(&path, &[txn()]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(
            lines[0],
            "TransactionID,Date,ProductID,ProductName,Quantity,UnitPrice,CustomerID,Region"
        );
        assert_eq!(lines[1], "T001,2024-12-01,P101,Laptop,2,45000,C001,North");
    }

    #[test]
    fn test_creates_missing_parent_dir() {
        let dir = std::env::temp_dir().join("salescope-writer-nested");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("out").join("enriched.txt");
        save_enriched(&path, &[]).unwrap();
        assert!(path.exists());
    }
}
