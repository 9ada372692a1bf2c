//! Drives a statement format across every page of one document.
//!
//! Failures are recovered as locally as possible: a page without text or
//! without a transaction window is skipped, a span whose fields cannot be
//! read is dropped, and only a document whose every page with text failed
//! is reported as unparseable.

use ledgerscan_core::{StatementDocument, TransactionRecord};
use log::{debug, warn};

use crate::error::{DocumentError, FieldExtractionError, PageError};
use crate::format::{BoundaryWindow, FormatRegistry, PageContext, StatementFormat};
use crate::lines::PageLines;
use crate::source::PageSource;

/// Why a page contributed nothing without being an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Cover or summary page the format always skips
    LeadingPage,
    /// No non-blank line of text
    Empty,
    /// The page source failed (OCR error or timeout)
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Skipped(SkipReason),
    BoundaryFailed(PageError),
    Extracted {
        window: BoundaryWindow,
        spans: usize,
        records: usize,
        dropped: Vec<FieldExtractionError>,
    },
}

/// Result for one page, addressed by its index in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub index: usize,
    pub outcome: PageOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    pub document: StatementDocument,
    /// One report per page, `pages[i].index == i`
    pub pages: Vec<PageReport>,
}

impl ParsedStatement {
    pub fn dropped_spans(&self) -> usize {
        self.pages
            .iter()
            .map(|page| match &page.outcome {
                PageOutcome::Extracted { dropped, .. } => dropped.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn failed_pages(&self) -> impl Iterator<Item = &PageReport> {
        self.pages
            .iter()
            .filter(|page| matches!(page.outcome, PageOutcome::BoundaryFailed(_)))
    }

    pub fn ambiguous_amounts(&self) -> usize {
        self.document
            .records
            .iter()
            .filter(|r| r.amount.is_ambiguous())
            .count()
    }
}

/// Picks a format per document from the registry, then parses it.
pub struct StatementParser<'r> {
    registry: &'r FormatRegistry,
}

impl<'r> StatementParser<'r> {
    pub fn new(registry: &'r FormatRegistry) -> Self {
        StatementParser { registry }
    }

    pub fn format_for(&self, identity: &str) -> Result<&'r dyn StatementFormat, DocumentError> {
        self.registry
            .detect(identity)
            .ok_or_else(|| DocumentError::UnknownFormat {
                identity: identity.to_string(),
            })
    }

    pub fn parse(&self, identity: &str, pages: &dyn PageSource) -> Result<ParsedStatement, DocumentError> {
        let format = self.format_for(identity)?;
        parse_with_format(format, identity, pages)
    }
}

/// Parse every page of one document with an already chosen format.
pub fn parse_with_format(
    format: &dyn StatementFormat,
    identity: &str,
    pages: &dyn PageSource,
) -> Result<ParsedStatement, DocumentError> {
    let page_count = pages.page_count();
    let mut records: Vec<TransactionRecord> = Vec::new();
    let mut reports = Vec::with_capacity(page_count);

    for index in 0..page_count {
        let outcome = parse_page(format, pages, index, page_count, &mut records);
        reports.push(PageReport { index, outcome });
    }

    let with_text = reports
        .iter()
        .filter(|r| !matches!(r.outcome, PageOutcome::Skipped(_)))
        .count();
    let failed = reports
        .iter()
        .filter(|r| matches!(r.outcome, PageOutcome::BoundaryFailed(_)))
        .count();
    if with_text > 0 && failed == with_text {
        return Err(DocumentError::NoParseablePages {
            identity: identity.to_string(),
            failed,
        });
    }

    debug!("{identity}: {} record(s) from {page_count} page(s)", records.len());

    Ok(ParsedStatement {
        document: StatementDocument::new(identity, format.id(), records),
        pages: reports,
    })
}

fn parse_page(
    format: &dyn StatementFormat,
    pages: &dyn PageSource,
    index: usize,
    page_count: usize,
    records: &mut Vec<TransactionRecord>,
) -> PageOutcome {
    if index < format.skipped_leading_pages() {
        debug!("page {index}: leading {} page skipped", format.id());
        return PageOutcome::Skipped(SkipReason::LeadingPage);
    }

    let raw = match pages.page_text(index) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("{e}; page treated as empty");
            return PageOutcome::Skipped(SkipReason::Unavailable(e.reason));
        }
    };

    let lines = PageLines::from_raw(&raw);
    if lines.is_empty() {
        debug!("{}", PageError::EmptyPage { page: index });
        return PageOutcome::Skipped(SkipReason::Empty);
    }

    let page = PageContext {
        index,
        is_last: index + 1 == page_count,
        raw: &raw,
        lines: &lines,
    };
    let window = match format.boundary(&page) {
        Ok(window) => window,
        Err(e) => {
            warn!("{e}; page skipped");
            return PageOutcome::BoundaryFailed(e);
        }
    };
    debug!("page {index}: window {:?} of {} line(s)", window.range(), lines.len());

    let spans = format.segment(&lines, window);
    let mut dropped = Vec::new();
    let mut extracted = 0;
    for span in &spans {
        match format.extract(span) {
            Ok(record) => {
                records.push(record);
                extracted += 1;
            }
            Err(e) => {
                warn!("page {index}, line {}: {e}; transaction dropped", span.first_line);
                dropped.push(e);
            }
        }
    }

    PageOutcome::Extracted {
        window,
        spans: spans.len(),
        records: extracted,
        dropped,
    }
}
