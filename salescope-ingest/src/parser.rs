//! Pipe-delimited record parser.
//!
//! One raw line becomes one [`Transaction`] or one [`ParseError`]; a
//! malformed line never aborts the batch. Numeric fields may carry
//! thousands-separator commas (`45,000`), which are stripped before
//! conversion. Commas inside the product name become single spaces (they
//! collide with the column separator of the legacy export format).

use salescope_core::Transaction;
use thiserror::Error;

/// Expected field count per record line.
pub const FIELD_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected 8 fields, found {found}")]
    FieldCount { found: usize },
    #[error("invalid {field}: '{value}'")]
    NumericFormat { field: &'static str, value: String },
}

/// A skipped line and why, with its 1-based ordinal in the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct LineError {
    pub line_number: usize,
    pub error: ParseError,
}

/// Parsed transactions plus the lines that were skipped.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<LineError>,
}

/// Parse a single record line.
///
/// Sign is accepted on the numeric fields here; rejecting non-positive
/// values is the validator's job.
pub fn parse_line(line: &str) -> Result<Transaction, ParseError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount {
            found: fields.len(),
        });
    }

    let quantity = parse_grouped_int(fields[4]).ok_or_else(|| ParseError::NumericFormat {
        field: "Quantity",
        value: fields[4].to_string(),
    })?;
    let unit_price = parse_grouped_float(fields[5]).ok_or_else(|| ParseError::NumericFormat {
        field: "UnitPrice",
        value: fields[5].to_string(),
    })?;

    Ok(Transaction {
        transaction_id: fields[0].to_string(),
        date: fields[1].to_string(),
        product_id: fields[2].to_string(),
        product_name: fields[3].replace(',', " "),
        quantity,
        unit_price,
        customer_id: fields[6].to_string(),
        region: fields[7].to_string(),
    })
}

fn parse_grouped_int(raw: &str) -> Option<i64> {
    raw.replace(',', "").parse().ok()
}

fn parse_grouped_float(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

/// Parse a batch of record lines independently. Skipped lines are recorded
/// with 1-based ordinals; the batch always runs to the end.
pub fn parse_lines(lines: &[String]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    for (i, line) in lines.iter().enumerate() {
        match parse_line(line) {
            Ok(transaction) => outcome.transactions.push(transaction),
            Err(error) => outcome.skipped.push(LineError {
                line_number: i + 1,
                error,
            }),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_thousands_separators() {
        let t = parse_line("T001|2024-12-01|P101|Laptop|2|45,000|C001|North").unwrap();
        assert_eq!(t.transaction_id, "T001");
        assert_eq!(t.quantity, 2);
        assert_eq!(t.unit_price, 45000.0);
        assert_eq!(t.amount(), 90000.0);
    }

    #[test]
    fn test_trims_every_field() {
        let t = parse_line("  T001 | 2024-12-01 | P101 | Laptop | 2 | 500 | C001 | North ").unwrap();
        assert_eq!(t.transaction_id, "T001");
        assert_eq!(t.region, "North");
    }

    #[test]
    fn test_product_name_commas_become_spaces() {
        let t = parse_line("T001|2024-12-01|P101|Laptop, 15 inch|2|45000|C001|North").unwrap();
        // Comma -> space, never collapsed
        assert_eq!(t.product_name, "Laptop  15 inch");
    }

    #[test]
    fn test_seven_fields_is_field_count_error() {
        let err = parse_line("T001|2024-12-01|P101|Laptop|2|45000|C001").unwrap_err();
        assert_eq!(err, ParseError::FieldCount { found: 7 });
    }

    #[test]
    fn test_bad_quantity_names_field_and_value() {
        let err = parse_line("T001|2024-12-01|P101|Laptop|two|45000|C001|North").unwrap_err();
        assert_eq!(
            err,
            ParseError::NumericFormat {
                field: "Quantity",
                value: "two".to_string(),
            }
        );
        assert_eq!(err.to_string(), "invalid Quantity: 'two'");
    }

    #[test]
    fn test_bad_unit_price_names_field_and_value() {
        let err = parse_line("T001|2024-12-01|P101|Laptop|2|free|C001|North").unwrap_err();
        assert_eq!(
            err,
            ParseError::NumericFormat {
                field: "UnitPrice",
                value: "free".to_string(),
            }
        );
    }

    #[test]
    fn test_negative_quantity_parses() {
        // Sign is allowed at parse time; the validator rejects it later
        let t = parse_line("T001|2024-12-01|P101|Laptop|-2|45000|C001|North").unwrap();
        assert_eq!(t.quantity, -2);
    }

    #[test]
    fn test_batch_skips_bad_lines_and_continues() {
        let lines: Vec<String> = [
            "T001|2024-12-01|P101|Laptop|2|45,000|C001|North",
            "T002|2024-12-01|P102|Mouse|5|500|C002",
            "T003|2024-12-02|P103|Keyboard|x|1500|C003|East",
            "T004|2024-12-02|P104|Monitor|1|12000|C004|West",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let outcome = parse_lines(&lines);
        assert_eq!(outcome.transactions.len(), 2);
        assert_eq!(outcome.skipped.len(), 2);
        assert_eq!(outcome.skipped[0].line_number, 2);
        assert_eq!(outcome.skipped[0].error, ParseError::FieldCount { found: 7 });
        assert_eq!(outcome.skipped[1].line_number, 3);
        assert!(matches!(
            outcome.skipped[1].error,
            ParseError::NumericFormat { field: "Quantity", .. }
        ));
    }
}
