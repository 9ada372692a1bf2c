//! NAB (dual-date columnar) statement strategy
//!
//! Expected OCR rows after the cover page:
//!   01/11/23 02/11/23 V7202 EFTPOS WOOLWORTHS 1234 SYDNEY 45.60
//!   03/11/23 03/11/23 7202 SALARY ACME PTY LTD 2,000.00
//!   03/11/23 03/11/23 INTERNET TRANSFER 7202 ...     <- never a transaction
//!
//! Every transaction is one line opening with two dates; there is no window
//! and no wrapping.

use ledgerscan_core::{Amount, BankFormat, TransactionRecord};
use regex::Regex;
use std::sync::LazyLock;

use crate::dates::is_numeric_date;
use crate::error::{FieldExtractionError, PageError};
use crate::format::{BoundaryWindow, PageContext, StatementFormat, TransactionSpan};
use crate::lines::PageLines;

/// Rows carrying this marker are transfer headers, not transactions.
pub const EXCLUSION_MARKER: &str = "INTERNET";

// details end at the first whole-token amount; amounts with a decimal part
// are preferred so reference numbers inside the details are not mistaken
// for the amount
static DECIMAL_DETAILS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:\d{2}/\d{2}/\d{2}\s\d{2}/\d{2}/\d{2}\s)+",
        r"(?:7202 |V7202 )",
        r"(?P<details>(?:.*?\s)?)",
        r"(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{1,3}(?:\s|$)"
    ))
    .expect("nab details regex")
});

static DETAILS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:\d{2}/\d{2}/\d{2}\s\d{2}/\d{2}/\d{2}\s)+",
        r"(?:7202 |V7202 )",
        r"(?P<details>(?:.*?\s)?)",
        r"(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,3})?(?:\s|$)"
    ))
    .expect("nab details regex")
});

#[derive(Debug, Clone)]
pub struct NabFormat {
    tokens: Vec<String>,
}

impl NabFormat {
    pub const DEFAULT_TOKENS: [&'static str; 2] = ["NAB", "nab"];

    pub fn with_tokens(tokens: Vec<String>) -> Self {
        NabFormat { tokens }
    }
}

impl Default for NabFormat {
    fn default() -> Self {
        NabFormat::with_tokens(super::owned_tokens(&Self::DEFAULT_TOKENS))
    }
}

/// Both leading tokens are dates and the row is not a transfer header.
pub fn is_transaction_line(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
        return false;
    };
    is_numeric_date(first) && is_numeric_date(second) && !line.contains(EXCLUSION_MARKER)
}

impl StatementFormat for NabFormat {
    fn id(&self) -> BankFormat {
        BankFormat::Nab
    }

    fn identity_tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The first page is an account summary.
    fn skipped_leading_pages(&self) -> usize {
        1
    }

    /// Every line is a candidate, so the window is the whole page.
    fn boundary(&self, page: &PageContext<'_>) -> Result<BoundaryWindow, PageError> {
        BoundaryWindow::full(page.lines).ok_or(PageError::EmptyPage { page: page.index })
    }

    fn segment(&self, lines: &PageLines, window: BoundaryWindow) -> Vec<TransactionSpan> {
        window
            .range()
            .map(|index| (index, &lines.as_slice()[index]))
            .filter(|(_, line)| is_transaction_line(line))
            .map(|(index, line)| TransactionSpan::single(index, line))
            .collect()
    }

    fn extract(&self, span: &TransactionSpan) -> Result<TransactionRecord, FieldExtractionError> {
        let text = span.text.as_str();

        let caps = DECIMAL_DETAILS_RE
            .captures(text)
            .or_else(|| DETAILS_RE.captures(text))
            .ok_or_else(|| FieldExtractionError::PatternMismatch {
                format: BankFormat::Nab,
                text: text.to_string(),
            })?;
        let details = &caps["details"];
        if details.trim().is_empty() {
            return Err(FieldExtractionError::EmptyDetails {
                text: text.to_string(),
            });
        }

        let mut tokens = text.split_whitespace();
        let date_processed = tokens.next().unwrap_or_default();
        let date_of_transaction = tokens.next().unwrap_or_default();
        let amount = text.split_whitespace().next_back().unwrap_or_default();

        Ok(TransactionRecord::new(
            date_processed,
            date_of_transaction,
            details,
            Amount::Known(amount.to_string()),
        ))
    }
}
