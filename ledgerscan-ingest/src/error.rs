use ledgerscan_core::BankFormat;
use thiserror::Error;

/// Per-page failures. The page is skipped, the document carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page {page} has no text")]
    EmptyPage { page: usize },

    #[error("page {page}: no line matching {marker:?}")]
    BoundaryNotFound { page: usize, marker: &'static str },
}

/// Per-span failures. The span is dropped, the page carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldExtractionError {
    #[error("{format} transaction pattern did not match: {text:?}")]
    PatternMismatch { format: BankFormat, text: String },

    #[error("transaction has no details: {text:?}")]
    EmptyDetails { text: String },
}

/// The page source could not produce text (OCR failure, timeout, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page {page}: {reason}")]
pub struct PageTextError {
    pub page: usize,
    pub reason: String,
}

impl PageTextError {
    pub fn new(page: usize, reason: impl Into<String>) -> Self {
        PageTextError {
            page,
            reason: reason.into(),
        }
    }
}

/// Failures that exclude a whole document from aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("{identity}: no registered statement format matches")]
    UnknownFormat { identity: String },

    #[error("{identity}: none of the {failed} page(s) with text had a transaction window")]
    NoParseablePages { identity: String, failed: usize },
}
