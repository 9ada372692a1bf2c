//! ledgerscan-core: data model shared by the statement parsing engine and period reporting

pub mod period;
pub mod record;
pub mod statement;

pub use period::{PeriodKey, normalize_month, normalize_year, parse_month};
pub use record::{Amount, COLUMNS, TransactionRecord};
pub use statement::{BankFormat, StatementDocument};
