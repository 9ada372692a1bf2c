//! Reporting period keys

use chrono::Month;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (year, month) reporting period, e.g. `("2023", "Nov")`.
///
/// Both parts are labels: the year names the workbook and the month names
/// the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeriodKey {
    pub year: String,
    pub month: String,
}

impl PeriodKey {
    pub fn new(year: impl Into<String>, month: impl Into<String>) -> Self {
        PeriodKey {
            year: year.into(),
            month: month.into(),
        }
    }

    /// Build a key from raw labels, normalising both.
    ///
    /// Returns `None` when the month label is not a recognised English
    /// month name or the year is not 2 to 4 digits.
    pub fn from_labels(month: &str, year: &str) -> Option<Self> {
        let month = normalize_month(month)?;
        let year = normalize_year(year)?;
        Some(PeriodKey::new(year, month))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

/// Map any month name or abbreviation (`Sept`, `september`, `Sep.`) to its
/// three-letter form.
pub fn normalize_month(label: &str) -> Option<&'static str> {
    let month = parse_month(label)?;
    Some(match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    })
}

/// Parse an English month name, full or abbreviated, case-insensitively.
pub fn parse_month(label: &str) -> Option<Month> {
    let label = label.trim().trim_end_matches(['.', ',']).to_ascii_lowercase();
    if label == "sept" {
        return Some(Month::September);
    }
    label.parse::<Month>().ok()
}

/// Two-digit years are taken as 20YY; four-digit years pass through.
pub fn normalize_year(label: &str) -> Option<String> {
    let label = label.trim();
    if !(2..=4).contains(&label.len()) || !label.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match label.len() {
        2 => Some(format!("20{label}")),
        _ => Some(label.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_variants() {
        assert_eq!(normalize_month("Nov"), Some("Nov"));
        assert_eq!(normalize_month("November"), Some("Nov"));
        assert_eq!(normalize_month("Sept"), Some("Sep"));
        assert_eq!(normalize_month("september"), Some("Sep"));
        assert_eq!(normalize_month("Feb."), Some("Feb"));
        assert_eq!(normalize_month("Febr"), None);
        assert_eq!(normalize_month(""), None);
    }

    #[test]
    fn test_year_labels() {
        assert_eq!(normalize_year("2023").as_deref(), Some("2023"));
        assert_eq!(normalize_year("23").as_deref(), Some("2023"));
        assert_eq!(normalize_year("2"), None);
        assert_eq!(normalize_year("20x3"), None);
    }

    #[test]
    fn test_from_labels() {
        let key = PeriodKey::from_labels("November", "2023").unwrap();
        assert_eq!(key, PeriodKey::new("2023", "Nov"));
        assert_eq!(key.to_string(), "Nov 2023");
    }
}
