//! Parsed statement documents

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::TransactionRecord;

/// Statement layout a document was parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankFormat {
    /// Day-first dated statements with wrapped descriptions (CommBank)
    #[serde(rename = "commbank")]
    CommBank,
    /// Dual-date columnar statements, one line per transaction (NAB)
    #[serde(rename = "nab")]
    Nab,
}

impl BankFormat {
    pub fn label(&self) -> &'static str {
        match self {
            BankFormat::CommBank => "CommBank",
            BankFormat::Nab => "NAB",
        }
    }
}

impl fmt::Display for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// All transactions read from one statement, in printed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDocument {
    /// File name (or equivalent) the document was loaded from
    pub source: String,
    pub format: BankFormat,
    pub records: Vec<TransactionRecord>,
}

impl StatementDocument {
    pub fn new(source: impl Into<String>, format: BankFormat, records: Vec<TransactionRecord>) -> Self {
        StatementDocument {
            source: source.into(),
            format,
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
