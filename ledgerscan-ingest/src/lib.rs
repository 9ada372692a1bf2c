//! ledgerscan-ingest: turns OCR page text from bank statements into transaction records.
//!
//! Pipeline per page: [`lines::PageLines`] filters the raw text, the document's
//! [`format::StatementFormat`] finds the boundary window, segments it into
//! spans and extracts one [`ledgerscan_core::TransactionRecord`] per span.
//! [`parser::StatementParser`] drives that across every page of a document.

pub mod dates;
pub mod error;
pub mod format;
pub mod lines;
pub mod parser;
pub mod parsers;
pub mod source;

pub use error::{DocumentError, FieldExtractionError, PageError, PageTextError};
pub use format::{BoundaryWindow, FormatRegistry, PageContext, StatementFormat, TransactionSpan};
pub use lines::PageLines;
pub use parser::{PageOutcome, PageReport, ParsedStatement, SkipReason, StatementParser, parse_with_format};
pub use parsers::{CommBankFormat, NabFormat};
pub use source::{PageSource, TextPages};
