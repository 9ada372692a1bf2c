//! CommBank (day-first dated) statement strategy
//!
//! Expected OCR text within a page:
//!   03 Feb 2023 Monthly Allowance to myself $120.00 $980.00
//!   10 Feb 2023 Card xx1234 WOOLWORTHS 1234
//!   SYDNEY AU Value Date: 08/02/2023 -$45.00 $935.00
//!   Created 04/03/2023 ...            <- intermediate page footer
//!   Any pending transactions ...      <- last page footer
//!
//! Descriptions wrap onto following lines; a new transaction starts at every
//! line that opens with `day month year`. The two `$` columns are amount and
//! running balance.

use ledgerscan_core::{Amount, BankFormat, TransactionRecord};
use log::{debug, warn};
use regex::Regex;
use std::sync::LazyLock;

use crate::dates::starts_with_day_month_year;
use crate::error::{FieldExtractionError, PageError};
use crate::format::{BoundaryWindow, PageContext, StatementFormat, TransactionSpan};
use crate::lines::PageLines;

/// Footer of every page but the last.
pub const CREATED_MARKER: &str = "Created";
/// Footer of the last page.
pub const PENDING_MARKER: &str = "Any pending transactions";
const VALUE_DATE_MARKER: &str = "Value Date: ";
const START_MARKER: &str = "DD Mon YYYY transaction date";

static START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d{2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{4}\b")
        .expect("commbank start regex")
});

static DETAILS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d{1,2}\s+[A-Za-z]+\.?\s+\d{4}[.,]?\s+(?P<details>.*?)(?:-?\$|$)")
        .expect("commbank details regex")
});

#[derive(Debug, Clone)]
pub struct CommBankFormat {
    tokens: Vec<String>,
}

impl CommBankFormat {
    pub const DEFAULT_TOKENS: [&'static str; 2] = ["CBA", "TransactionSummary"];

    pub fn with_tokens(tokens: Vec<String>) -> Self {
        CommBankFormat { tokens }
    }
}

impl Default for CommBankFormat {
    fn default() -> Self {
        CommBankFormat::with_tokens(super::owned_tokens(&Self::DEFAULT_TOKENS))
    }
}

impl StatementFormat for CommBankFormat {
    fn id(&self) -> BankFormat {
        BankFormat::CommBank
    }

    fn identity_tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The window runs from the first dated line to the page footer. The
    /// last page (or any page already showing the pending-transactions
    /// footer) stops at that footer instead of "Created".
    fn boundary(&self, page: &PageContext<'_>) -> Result<BoundaryWindow, PageError> {
        let marker = if page.is_last || page.raw.contains(PENDING_MARKER) {
            PENDING_MARKER
        } else {
            CREATED_MARKER
        };

        let stop = page.lines.position_of(marker).ok_or(PageError::BoundaryNotFound {
            page: page.index,
            marker,
        })?;

        // a footer line is never a transaction start, so only look above it
        let start = page.lines.as_slice()[..stop]
            .iter()
            .position(|line| START_RE.is_match(line))
            .ok_or(PageError::BoundaryNotFound {
                page: page.index,
                marker: START_MARKER,
            })?;

        BoundaryWindow::new(start, stop, page.lines.len()).ok_or(PageError::BoundaryNotFound {
            page: page.index,
            marker: START_MARKER,
        })
    }

    fn segment(&self, lines: &PageLines, window: BoundaryWindow) -> Vec<TransactionSpan> {
        let mut spans = Vec::new();
        let mut current: Option<TransactionSpan> = None;

        for index in window.range() {
            let line = &lines.as_slice()[index];
            if starts_with_day_month_year(line) {
                if let Some(done) = current.replace(TransactionSpan::single(index, line)) {
                    spans.push(done);
                }
            } else if let Some(span) = current.as_mut() {
                span.push_line(line);
            } else {
                debug!("line {index} precedes the first transaction, ignored: {line:?}");
            }
        }

        spans.extend(current);
        spans
    }

    fn extract(&self, span: &TransactionSpan) -> Result<TransactionRecord, FieldExtractionError> {
        let text = span.text.as_str();

        let caps = DETAILS_RE
            .captures(text)
            .ok_or_else(|| FieldExtractionError::PatternMismatch {
                format: BankFormat::CommBank,
                text: text.to_string(),
            })?;
        let details = &caps["details"];
        if details.trim().is_empty() {
            return Err(FieldExtractionError::EmptyDetails {
                text: text.to_string(),
            });
        }

        let date_processed = text.split_whitespace().take(3).collect::<Vec<_>>().join(" ");
        let date_of_transaction = text
            .split_once(VALUE_DATE_MARKER)
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .map(str::to_string)
            .unwrap_or_else(|| date_processed.clone());

        Ok(TransactionRecord::new(
            date_processed,
            date_of_transaction,
            details,
            read_amount(text),
        ))
    }
}

/// Amount and balance are the only `$` tokens on a well-formed row, so the
/// amount is the first of exactly two.
fn read_amount(text: &str) -> Amount {
    let currency: Vec<&str> = text.split_whitespace().filter(|t| t.contains('$')).collect();
    match currency.len() {
        0 | 1 => Amount::Missing,
        2 => Amount::Known(currency[0].to_string()),
        _ => {
            warn!("ambiguous amount, {} currency tokens in {text:?}", currency.len());
            Amount::Ambiguous(currency.into_iter().map(str::to_string).collect())
        }
    }
}
