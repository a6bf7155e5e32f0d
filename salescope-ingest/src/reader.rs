//! Raw sales-file reading with encoding fallback.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Read a sales data file into trimmed record lines.
///
/// Decodes UTF-8 first and falls back to Latin-1 for legacy exports. The
/// header row is skipped and blank lines are dropped. A missing file or a
/// file with no records is an error.
pub fn read_sales_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let text = decode(bytes);

    let lines: Vec<String> = text
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        bail!("{} is empty or contains only a header", path.display());
    }
    Ok(lines)
}

/// UTF-8 with Latin-1 fallback. Latin-1 maps every byte to its code point,
/// so the fallback is total.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, bytes: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("salescope-reader-{name}"));
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_skips_header_and_blank_lines() {
        let path = write_temp(
            "basic.txt",
            b"TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region\n\
              T001|2024-12-01|P101|Laptop|2|45000|C001|North\n\
              \n\
              T002|2024-12-02|P102|Mouse|5|500|C002|South\n",
        );
        let lines = read_sales_lines(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("T001"));
        assert!(lines[1].starts_with("T002"));
    }

    #[test]
    fn test_latin1_fallback() {
        // "Café" as Latin-1: 0xE9 is not valid UTF-8
        let mut bytes = b"header\nT001|2024-12-01|P101|Caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"|2|100|C001|North\n");

        let path = write_temp("latin1.txt", &bytes);
        let lines = read_sales_lines(&path).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Café"));
    }

    #[test]
    fn test_header_only_file_is_an_error() {
        let path = write_temp("header-only.txt", b"TransactionID|Date\n");
        assert!(read_sales_lines(&path).is_err());
    }

    #[test]
    fn test_missing_file_error_names_path() {
        let err = read_sales_lines("no/such/sales_data.txt").unwrap_err();
        assert!(format!("{err:#}").contains("no/such/sales_data.txt"));
    }
}
