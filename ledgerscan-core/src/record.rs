//! Canonical transaction record produced by the field extractors

use serde::{Deserialize, Serialize};

/// Output column names, in the order every sheet is written.
pub const COLUMNS: [&str; 4] = ["Date processed", "Date of transaction", "Details", "Amount"];

/// Amount column of a transaction.
///
/// Statements print an amount column and a running balance column, so the
/// extractor can only pick an amount when the layout is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Amount {
    /// A single amount token, kept verbatim (e.g. `$120.00`, `-$4.50`, `1,204.10`)
    Known(String),
    /// No amount could be read from the span
    Missing,
    /// More currency tokens than the layout allows; every candidate is kept
    Ambiguous(Vec<String>),
}

impl Amount {
    /// The amount text, if one was resolved.
    pub fn value(&self) -> Option<&str> {
        match self {
            Amount::Known(v) => Some(v),
            Amount::Missing | Amount::Ambiguous(_) => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Amount::Ambiguous(_))
    }
}

/// One transaction as printed on a statement.
///
/// Dates stay as the statement prints them; formats disagree on date layout
/// and downstream sheets show them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date_processed: String,
    pub date_of_transaction: String,
    /// Never empty
    pub details: String,
    pub amount: Amount,
}

impl TransactionRecord {
    pub fn new(
        date_processed: impl Into<String>,
        date_of_transaction: impl Into<String>,
        details: impl Into<String>,
        amount: Amount,
    ) -> Self {
        TransactionRecord {
            date_processed: date_processed.into(),
            date_of_transaction: date_of_transaction.into(),
            details: details.into(),
            amount,
        }
    }

    /// Row cells in [`COLUMNS`] order. Unresolved amounts become an empty cell.
    pub fn to_row(&self) -> [&str; 4] {
        [
            &self.date_processed,
            &self.date_of_transaction,
            &self.details,
            self.amount.value().unwrap_or(""),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_blanks_unresolved_amounts() {
        let known = TransactionRecord::new("03 Feb 2023", "03 Feb 2023", "Rent", Amount::Known("$10.00".into()));
        assert_eq!(known.to_row()[3], "$10.00");

        let ambiguous = TransactionRecord::new(
            "03 Feb 2023",
            "03 Feb 2023",
            "Gift $5 voucher",
            Amount::Ambiguous(vec!["$5".into(), "$5.00".into(), "$95.00".into()]),
        );
        assert_eq!(ambiguous.to_row()[3], "");
        assert!(ambiguous.amount.is_ambiguous());
    }

    #[test]
    fn test_amount_serializes_tagged() {
        let json = serde_json::to_string(&Amount::Known("$1.00".into())).unwrap();
        assert_eq!(json, r#"{"kind":"known","value":"$1.00"}"#);
        let json = serde_json::to_string(&Amount::Missing).unwrap();
        assert_eq!(json, r#"{"kind":"missing"}"#);
    }
}
