use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeriodPatternError {
    #[error("invalid period pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("period pattern needs two capture groups (month, year), found {0}")]
    CaptureGroups(usize),
}

/// A document whose identity does not name a reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{identity}: no month and year in document name")]
pub struct PeriodKeyUnresolved {
    pub identity: String,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
