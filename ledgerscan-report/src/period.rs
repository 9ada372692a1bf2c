//! Groups parsed statements into (year, month) reporting periods.
//!
//! Documents are merged in the order they are added and records are never
//! re-sorted: a period is only as chronological as its input documents.

use indexmap::IndexMap;
use ledgerscan_core::{PeriodKey, StatementDocument, TransactionRecord};
use log::{debug, warn};
use regex::Regex;

use crate::error::{PeriodKeyUnresolved, PeriodPatternError};

/// Month names accepted in document names, longest alternatives first.
pub const DEFAULT_PERIOD_PATTERN: &str = r"(Jan|January|Feb|February|Mar|March|Apr|April|May|Jun|June|Jul|July|Aug|August|Sep|Sept|September|Oct|October|Nov|November|Dec|December)(\d{2,4})";

/// Extracts a month label (group 1) and a year label (group 2) from a
/// document identity such as `CBASept2023.pdf`.
#[derive(Debug, Clone)]
pub struct PeriodPattern {
    regex: Regex,
}

impl PeriodPattern {
    pub fn new(pattern: &str) -> Result<Self, PeriodPatternError> {
        let regex = Regex::new(pattern)?;
        let groups = regex.captures_len() - 1;
        if groups < 2 {
            return Err(PeriodPatternError::CaptureGroups(groups));
        }
        Ok(PeriodPattern { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn resolve(&self, identity: &str) -> Result<PeriodKey, PeriodKeyUnresolved> {
        let unresolved = || PeriodKeyUnresolved {
            identity: identity.to_string(),
        };
        let caps = self.regex.captures(identity).ok_or_else(unresolved)?;
        let (Some(month), Some(year)) = (caps.get(1), caps.get(2)) else {
            return Err(unresolved());
        };
        PeriodKey::from_labels(month.as_str(), year.as_str()).ok_or_else(unresolved)
    }
}

impl Default for PeriodPattern {
    fn default() -> Self {
        PeriodPattern {
            regex: Regex::new(DEFAULT_PERIOD_PATTERN).expect("default period regex"),
        }
    }
}

/// Every record of one reporting period, across documents and banks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodBatch {
    pub key: PeriodKey,
    pub records: Vec<TransactionRecord>,
    /// Contributing documents, in merge order
    pub sources: Vec<String>,
}

impl PeriodBatch {
    fn new(key: PeriodKey) -> Self {
        PeriodBatch {
            key,
            records: Vec::new(),
            sources: Vec::new(),
        }
    }
}

/// Single-threaded merge point for parsed documents.
#[derive(Debug, Default)]
pub struct PeriodAggregator {
    pattern: PeriodPattern,
    batches: IndexMap<PeriodKey, PeriodBatch>,
    unresolved: Vec<PeriodKeyUnresolved>,
}

impl PeriodAggregator {
    pub fn new(pattern: PeriodPattern) -> Self {
        PeriodAggregator {
            pattern,
            batches: IndexMap::new(),
            unresolved: Vec::new(),
        }
    }

    /// Append a document's records to its period. A document without a
    /// period is kept out of every batch and remembered as unresolved.
    pub fn add(&mut self, document: StatementDocument) -> Result<PeriodKey, PeriodKeyUnresolved> {
        let key = match self.pattern.resolve(&document.source) {
            Ok(key) => key,
            Err(e) => {
                warn!("{e}; document excluded from aggregation");
                self.unresolved.push(e.clone());
                return Err(e);
            }
        };

        debug!("{}: {} record(s) into {key}", document.source, document.records.len());
        let batch = self
            .batches
            .entry(key.clone())
            .or_insert_with(|| PeriodBatch::new(key.clone()));
        batch.records.extend(document.records);
        batch.sources.push(document.source);
        Ok(key)
    }

    pub fn extend<I>(&mut self, documents: I)
    where
        I: IntoIterator<Item = StatementDocument>,
    {
        for document in documents {
            let _ = self.add(document);
        }
    }

    pub fn get(&self, key: &PeriodKey) -> Option<&PeriodBatch> {
        self.batches.get(key)
    }

    /// Batches in the order their periods were first seen.
    pub fn batches(&self) -> impl Iterator<Item = &PeriodBatch> {
        self.batches.values()
    }

    pub fn unresolved(&self) -> &[PeriodKeyUnresolved] {
        &self.unresolved
    }

    pub fn into_batches(self) -> Vec<PeriodBatch> {
        self.batches.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerscan_core::{Amount, BankFormat};

    fn record(details: &str) -> TransactionRecord {
        TransactionRecord::new("01 Nov 2023", "01 Nov 2023", details, Amount::Missing)
    }

    fn doc(source: &str, format: BankFormat, details: &[&str]) -> StatementDocument {
        StatementDocument::new(source, format, details.iter().map(|d| record(d)).collect())
    }

    #[test]
    fn test_default_pattern_resolves() {
        let pattern = PeriodPattern::default();
        assert_eq!(pattern.resolve("CBASept2023.pdf").unwrap(), PeriodKey::new("2023", "Sep"));
        assert_eq!(pattern.resolve("NAB_Nov23.pdf").unwrap(), PeriodKey::new("2023", "Nov"));
        assert_eq!(
            pattern.resolve("TransactionSummaryDecember2023.pdf").unwrap(),
            PeriodKey::new("2023", "Dec")
        );
        assert!(pattern.resolve("CBA_statement.pdf").is_err());
    }

    #[test]
    fn test_pattern_needs_two_groups() {
        assert!(matches!(
            PeriodPattern::new(r"(Nov)\d{4}"),
            Err(PeriodPatternError::CaptureGroups(1))
        ));
        assert!(matches!(PeriodPattern::new(r"(Nov"), Err(PeriodPatternError::Regex(_))));
        assert!(PeriodPattern::new(r"(\w{3})-(\d{4})").is_ok());
    }

    #[test]
    fn test_same_period_concatenates_in_input_order() {
        let mut aggregator = PeriodAggregator::default();
        aggregator.add(doc("CBANov2023.pdf", BankFormat::CommBank, &["a", "b"])).unwrap();
        aggregator.add(doc("NAB_Oct2023.pdf", BankFormat::Nab, &["x"])).unwrap();
        aggregator.add(doc("NAB_November2023.pdf", BankFormat::Nab, &["c"])).unwrap();

        let nov = aggregator.get(&PeriodKey::new("2023", "Nov")).unwrap();
        let details: Vec<_> = nov.records.iter().map(|r| r.details.as_str()).collect();
        assert_eq!(details, vec!["a", "b", "c"]);
        assert_eq!(nov.sources, vec!["CBANov2023.pdf", "NAB_November2023.pdf"]);

        let order: Vec<_> = aggregator.batches().map(|b| b.key.month.as_str()).collect();
        assert_eq!(order, vec!["Nov", "Oct"]);
    }

    #[test]
    fn test_unresolved_document_is_excluded() {
        let mut aggregator = PeriodAggregator::default();
        aggregator.extend([
            doc("CBA_statement.pdf", BankFormat::CommBank, &["lost"]),
            doc("CBANov2023.pdf", BankFormat::CommBank, &["kept"]),
        ]);

        assert_eq!(aggregator.unresolved().len(), 1);
        assert_eq!(aggregator.unresolved()[0].identity, "CBA_statement.pdf");
        let batches = aggregator.into_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].records.len(), 1);
    }
}
