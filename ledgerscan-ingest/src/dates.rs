//! Date predicates used to recognise where transactions start.
//!
//! Both formats only need to know whether some leading tokens read as a real
//! calendar date; the text itself is kept verbatim in the records.

use chrono::NaiveDate;
use ledgerscan_core::parse_month;

/// True when the first three whitespace tokens of `line` read as
/// `day month year`, e.g. `03 Feb 2023` or `3 February 2023.`.
///
/// Trailing punctuation on the tokens is tolerated, as is any text after
/// the third token.
pub fn starts_with_day_month_year(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    let (Some(day), Some(month), Some(year)) = (tokens.next(), tokens.next(), tokens.next()) else {
        return false;
    };
    day_month_year(day, month, year).is_some()
}

fn day_month_year(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day = strip_punctuation(day);
    if day.is_empty() || day.len() > 2 || !day.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month = parse_month(month)?;
    let year = strip_punctuation(year);
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.number_from_month(), day.parse().ok()?)
}

/// Parse a numeric `DD/MM/YY` token. `-` and `.` separators and four-digit
/// years are accepted too.
pub fn parse_numeric_date(token: &str) -> Option<NaiveDate> {
    let mut parts = token.split(['/', '-', '.']);
    let (Some(day), Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    let digits = |s: &str, lens: &[usize]| lens.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(day, &[1, 2]) || !digits(month, &[1, 2]) || !digits(year, &[2, 4]) {
        return None;
    }
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

pub fn is_numeric_date(token: &str) -> bool {
    parse_numeric_date(token).is_some()
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_end_matches(['.', ',', ':', ';'])
}
