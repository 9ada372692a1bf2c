//! ledgerscan-report: period aggregation of parsed statements and sheet output

pub mod error;
pub mod period;
pub mod sink;

pub use error::{PeriodKeyUnresolved, PeriodPatternError, SinkError};
pub use period::{DEFAULT_PERIOD_PATTERN, PeriodAggregator, PeriodBatch, PeriodPattern};
pub use sink::{CsvWorkbookSink, PeriodSink};
