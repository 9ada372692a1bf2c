//! Per-bank parsing strategies and the registry that picks one per document.

use ledgerscan_core::{BankFormat, TransactionRecord};
use std::ops::Range;

use crate::error::{FieldExtractionError, PageError};
use crate::lines::PageLines;
use crate::parsers::{CommBankFormat, NabFormat};

/// Inclusive-exclusive range of a page's filtered lines holding transactions.
///
/// Always non-empty: `start < stop <= line_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryWindow {
    start: usize,
    stop: usize,
}

impl BoundaryWindow {
    /// `None` unless `start < stop <= line_count`.
    pub fn new(start: usize, stop: usize, line_count: usize) -> Option<Self> {
        (start < stop && stop <= line_count).then_some(BoundaryWindow { start, stop })
    }

    /// The whole page.
    pub fn full(lines: &PageLines) -> Option<Self> {
        BoundaryWindow::new(0, lines.len(), lines.len())
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.stop
    }
}

/// Lines believed to make up exactly one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSpan {
    /// Index of the span's first line within the page's filtered lines
    pub first_line: usize,
    pub line_count: usize,
    /// The span's lines joined by single spaces
    pub text: String,
}

impl TransactionSpan {
    pub fn single(index: usize, line: &str) -> Self {
        TransactionSpan {
            first_line: index,
            line_count: 1,
            text: line.to_string(),
        }
    }

    /// Append a wrapped continuation line.
    pub fn push_line(&mut self, line: &str) {
        self.text.push(' ');
        self.text.push_str(line);
        self.line_count += 1;
    }
}

/// What a strategy sees of the page being parsed.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub index: usize,
    /// Last page of the document
    pub is_last: bool,
    /// Unfiltered page text
    pub raw: &'a str,
    pub lines: &'a PageLines,
}

/// Boundary detection, segmentation and field extraction for one statement layout.
pub trait StatementFormat: Send + Sync {
    fn id(&self) -> BankFormat;

    /// Substrings of a document identity (usually its file name) that select this format.
    fn identity_tokens(&self) -> &[String];

    /// Leading pages (cover / summary) that never hold transactions.
    fn skipped_leading_pages(&self) -> usize {
        0
    }

    fn boundary(&self, page: &PageContext<'_>) -> Result<BoundaryWindow, PageError>;

    fn segment(&self, lines: &PageLines, window: BoundaryWindow) -> Vec<TransactionSpan>;

    fn extract(&self, span: &TransactionSpan) -> Result<TransactionRecord, FieldExtractionError>;

    fn matches_identity(&self, identity: &str) -> bool {
        self.identity_tokens()
            .iter()
            .any(|token| !token.is_empty() && identity.contains(token.as_str()))
    }
}

/// Ordered set of known formats. The first format whose identity token
/// occurs in a document's identity wins.
pub struct FormatRegistry {
    formats: Vec<Box<dyn StatementFormat>>,
}

impl FormatRegistry {
    pub fn empty() -> Self {
        FormatRegistry { formats: Vec::new() }
    }

    pub fn register(&mut self, format: impl StatementFormat + 'static) -> &mut Self {
        self.formats.push(Box::new(format));
        self
    }

    pub fn detect(&self, identity: &str) -> Option<&dyn StatementFormat> {
        self.formats
            .iter()
            .find(|format| format.matches_identity(identity))
            .map(|format| &**format)
    }

    pub fn get(&self, id: BankFormat) -> Option<&dyn StatementFormat> {
        self.formats
            .iter()
            .find(|format| format.id() == id)
            .map(|format| &**format)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = FormatRegistry::empty();
        registry.register(CommBankFormat::default()).register(NabFormat::default());
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_invariant() {
        assert!(BoundaryWindow::new(0, 3, 3).is_some());
        assert!(BoundaryWindow::new(2, 2, 3).is_none());
        assert!(BoundaryWindow::new(1, 4, 3).is_none());
        assert!(BoundaryWindow::full(&PageLines::default()).is_none());
    }

    #[test]
    fn test_default_registry_detection() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.len(), 2);

        let detect = |identity: &str| registry.detect(identity).map(|f| f.id());
        assert_eq!(detect("CBASept2023.pdf"), Some(BankFormat::CommBank));
        assert_eq!(detect("TransactionSummaryNov2023.pdf"), Some(BankFormat::CommBank));
        assert_eq!(detect("NAB_Oct2023.pdf"), Some(BankFormat::Nab));
        assert_eq!(detect("nab-dec23.pdf"), Some(BankFormat::Nab));
        assert_eq!(detect("westpac_Nov2023.pdf"), None);
    }

    #[test]
    fn test_registry_order_breaks_ties() {
        let registry = FormatRegistry::default();
        let format = registry.detect("CBA_and_NAB_Nov2023.pdf").unwrap();
        assert_eq!(format.id(), BankFormat::CommBank);
    }

    #[test]
    fn test_custom_tokens() {
        let mut registry = FormatRegistry::empty();
        registry.register(NabFormat::with_tokens(vec!["National".into()]));
        assert!(registry.detect("NAB_Oct2023.pdf").is_none());
        assert_eq!(registry.detect("National Oct2023.pdf").map(|f| f.id()), Some(BankFormat::Nab));
        assert!(registry.get(BankFormat::CommBank).is_none());
    }

    #[test]
    fn test_span_joins_wrapped_lines() {
        let mut span = TransactionSpan::single(4, "03 Feb 2023 Transfer to");
        span.push_line("savings $10.00 $90.00");
        assert_eq!(span.text, "03 Feb 2023 Transfer to savings $10.00 $90.00");
        assert_eq!(span.line_count, 2);
        assert_eq!(span.first_line, 4);
    }
}
