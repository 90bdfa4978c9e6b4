//! The `dd/mm/yyyy` date form used by the catalog's clients
//!
//! Parsing accepts one or two digits for day and month and exactly four
//! for the year, separated by `/`. The day is checked against the month
//! and year, so `30/02/2024` is rejected. Formatting always zero-pads.

use chrono::NaiveDate;
use thiserror::Error;

/// Why a display date was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// Not `day/month/year` with numeric parts of the right width
    #[error("Date '{0}' is not in dd/mm/yyyy format")]
    Format(String),

    /// Well-formed but not a real calendar date
    #[error("Date '{0}' does not exist in the calendar")]
    Calendar(String),
}

/// Parse a `dd/mm/yyyy` string into a calendar date
///
/// # Examples
///
/// ```
/// use pillbox_domain::display_date;
///
/// let date = display_date::parse("1/3/2023").unwrap();
/// assert_eq!(display_date::format(date), "01/03/2023");
/// assert!(display_date::parse("29/02/2023").is_err());
/// ```
pub fn parse(input: &str) -> Result<NaiveDate, DateParseError> {
    let format_err = || DateParseError::Format(input.to_string());

    let mut parts = input.split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(format_err());
    };

    let day = numeric_part(day, 1..=2).ok_or_else(format_err)?;
    let month = numeric_part(month, 1..=2).ok_or_else(format_err)?;
    let year = numeric_part(year, 4..=4).ok_or_else(format_err)?;

    // Year zero has no place in the Gregorian calendar clients use
    if year == 0 {
        return Err(DateParseError::Calendar(input.to_string()));
    }

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| DateParseError::Calendar(input.to_string()))
}

/// Render a date as `dd/mm/yyyy`
pub fn format(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// ASCII digits only, length within `width`
fn numeric_part(part: &str, width: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !width.contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_padded() {
        assert_eq!(parse("01/01/2023").unwrap(), ymd(2023, 1, 1));
        assert_eq!(parse("15/03/2023").unwrap(), ymd(2023, 3, 15));
        assert_eq!(parse("31/12/1999").unwrap(), ymd(1999, 12, 31));
    }

    #[test]
    fn test_parse_unpadded() {
        assert_eq!(parse("1/1/2023").unwrap(), ymd(2023, 1, 1));
        assert_eq!(parse("5/11/2023").unwrap(), ymd(2023, 11, 5));
    }

    #[test]
    fn test_leap_years() {
        assert_eq!(parse("29/02/2024").unwrap(), ymd(2024, 2, 29));
        assert!(matches!(parse("29/02/2023"), Err(DateParseError::Calendar(_))));
        assert!(matches!(parse("30/02/2024"), Err(DateParseError::Calendar(_))));
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(matches!(parse("00/01/2023"), Err(DateParseError::Calendar(_))));
        assert!(matches!(parse("32/01/2023"), Err(DateParseError::Calendar(_))));
        assert!(matches!(parse("31/04/2023"), Err(DateParseError::Calendar(_))));
        assert!(matches!(parse("10/13/2023"), Err(DateParseError::Calendar(_))));
        assert!(matches!(parse("01/01/0000"), Err(DateParseError::Calendar(_))));
    }

    #[test]
    fn test_rejects_other_formats() {
        for input in [
            "",
            "2023-01-01",
            "01-01-2023",
            "01/01/23",
            "01/01/02023",
            "001/01/2023",
            "01/01/2023/",
            "/01/2023",
            " 01/01/2023",
            "01/01/2023 ",
            "+1/01/2023",
            "aa/bb/cccc",
        ] {
            assert!(
                matches!(parse(input), Err(DateParseError::Format(_))),
                "expected format error for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_format_is_zero_padded() {
        assert_eq!(format(ymd(2023, 1, 1)), "01/01/2023");
        assert_eq!(format(ymd(2023, 3, 15)), "15/03/2023");
        assert_eq!(format(ymd(987, 7, 4)), "04/07/0987");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: every calendar date survives format then parse
        #[test]
        fn test_format_parse_roundtrip(days in 0i64..(365 * 8999)) {
            let date = NaiveDate::from_ymd_opt(1000, 1, 1).unwrap() + chrono::Duration::days(days);

            let rendered = format(date);
            prop_assert_eq!(rendered.len(), 10);
            prop_assert_eq!(parse(&rendered), Ok(date));
        }

        /// Property: unpadded input parses to the same date as padded input
        #[test]
        fn test_padding_is_optional(day in 1u32..=28, month in 1u32..=12, year in 1000i32..=9999) {
            let padded = format!("{:02}/{:02}/{}", day, month, year);
            let unpadded = format!("{}/{}/{}", day, month, year);
            prop_assert_eq!(parse(&padded), parse(&unpadded));
        }
    }
}
