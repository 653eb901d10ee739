//! The `MM.YYYY` date codec.
//!
//! Chart rows carry their range endpoints as `MM.YYYY` text. The chart
//! configuration wants epoch-millisecond pairs. This module converts
//! between the two: parse with validation, format with zero-padding, and
//! map a month to the epoch timestamp of its first day at UTC midnight.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

/// Error type for `MM.YYYY` parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Expected MM.YYYY, got: {0}")]
    Malformed(String),

    #[error("Month out of range: {0}")]
    MonthOutOfRange(String),

    #[error("Year out of range: {0}")]
    YearOutOfRange(String),
}

/// A calendar month, the resolution the chart works at.
///
/// Constructed through [`MonthYear::parse`] or [`MonthYear::new`], so the
/// month is always in `1..=12` and the year in `1..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    month: u32,
    year: i32,
}

impl MonthYear {
    /// Create a `MonthYear` from raw parts.
    pub fn new(month: u32, year: i32) -> Result<Self, FormatError> {
        if !(1..=12).contains(&month) {
            return Err(FormatError::MonthOutOfRange(month.to_string()));
        }
        if !(1..=9999).contains(&year) {
            return Err(FormatError::YearOutOfRange(year.to_string()));
        }
        Ok(Self { month, year })
    }

    /// Parse `MM.YYYY` text. Single-digit months are accepted; anything
    /// that is not two dot-separated integers with a month in `1..=12`
    /// and a positive year is rejected.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let mut parts = text.split('.');
        let (Some(month_str), Some(year_str), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(FormatError::Malformed(text.to_string()));
        };

        let month: u32 = month_str
            .parse()
            .map_err(|_| FormatError::MonthOutOfRange(month_str.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(FormatError::MonthOutOfRange(month_str.to_string()));
        }

        let year: i32 = year_str
            .parse()
            .map_err(|_| FormatError::YearOutOfRange(year_str.to_string()))?;
        if !(1..=9999).contains(&year) {
            return Err(FormatError::YearOutOfRange(year_str.to_string()));
        }

        Ok(Self { month, year })
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn year(self) -> i32 {
        self.year
    }

    /// Epoch milliseconds of the first day of this month at UTC midnight.
    ///
    /// Both range endpoints use this conversion, so an end bound of
    /// `12.2024` maps to December 1st, not December 31st. Stored charts
    /// depend on that mapping.
    pub fn epoch_ms(self) -> i64 {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map_or(0, |dt| dt.and_utc().timestamp_millis())
    }

    /// The following calendar month, carrying over year boundaries.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                month: 1,
                year: self.year.saturating_add(1).min(9999),
            }
        } else {
            Self {
                month: self.month + 1,
                year: self.year,
            }
        }
    }

    /// The preceding calendar month, carrying over year boundaries.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                month: 12,
                year: self.year.saturating_sub(1).max(1),
            }
        } else {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        }
    }
}

impl fmt::Display for MonthYear {
    /// Formats as `MM.YYYY` with the month zero-padded to two digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{}", self.month, self.year)
    }
}

impl FromStr for MonthYear {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Convert a pair of `MM.YYYY` strings into the `[start, end]` epoch pair
/// the series builder emits.
///
/// Tolerant by contract: an empty or unparseable endpoint becomes epoch
/// `0` and the row still charts. Chronology is not checked, so the result
/// may be reversed. Callers that cannot accept default endpoints must
/// validate before calling.
pub fn epoch_range(start_text: &str, end_text: &str) -> [i64; 2] {
    let endpoint = |text: &str| MonthYear::parse(text).map_or(0, MonthYear::epoch_ms);
    [endpoint(start_text), endpoint(end_text)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let my = MonthYear::parse("01.2024").unwrap();
        assert_eq!(my.month(), 1);
        assert_eq!(my.year(), 2024);
    }

    #[test]
    fn test_parse_single_digit_month() {
        let my = MonthYear::parse("1.2024").unwrap();
        assert_eq!(my.month(), 1);
        assert_eq!(my.to_string(), "01.2024");
    }

    #[test]
    fn test_parse_rejects_month_out_of_range() {
        assert!(matches!(
            MonthYear::parse("13.2024"),
            Err(FormatError::MonthOutOfRange(_))
        ));
        assert!(matches!(
            MonthYear::parse("0.2024"),
            Err(FormatError::MonthOutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_year() {
        assert!(matches!(
            MonthYear::parse("06.abc"),
            Err(FormatError::YearOutOfRange(_))
        ));
        assert!(matches!(
            MonthYear::parse("06.0"),
            Err(FormatError::YearOutOfRange(_))
        ));
        assert!(matches!(
            MonthYear::parse("06.-5"),
            Err(FormatError::YearOutOfRange(_))
        ));
        assert!(matches!(
            MonthYear::parse("06.10000"),
            Err(FormatError::YearOutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!(matches!(
            MonthYear::parse(""),
            Err(FormatError::Malformed(_) | FormatError::MonthOutOfRange(_))
        ));
        assert!(MonthYear::parse("2024").is_err());
        assert!(MonthYear::parse("01.02.2024").is_err());
        assert!(MonthYear::parse("01-2024").is_err());
    }

    #[test]
    fn test_format_roundtrip() {
        for text in ["01.2024", "12.1999", "06.1", "11.9999"] {
            let my = MonthYear::parse(text).unwrap();
            assert_eq!(my.to_string(), text);
            assert_eq!(MonthYear::parse(&my.to_string()).unwrap(), my);
        }
    }

    #[test]
    fn test_format_normalizes_padding() {
        assert_eq!(MonthYear::parse("7.2023").unwrap().to_string(), "07.2023");
        assert_eq!(MonthYear::parse("10.2023").unwrap().to_string(), "10.2023");
    }

    #[test]
    fn test_epoch_ms_is_utc_month_start() {
        // 1970-01-01T00:00:00Z
        assert_eq!(MonthYear::new(1, 1970).unwrap().epoch_ms(), 0);
        // 2024-01-01T00:00:00Z
        assert_eq!(
            MonthYear::new(1, 2024).unwrap().epoch_ms(),
            1_704_067_200_000
        );
        // 2038-01-19 is the placeholder end bound; its month start is 2038-01-01
        assert_eq!(
            MonthYear::new(1, 2038).unwrap().epoch_ms(),
            2_145_916_800_000
        );
    }

    #[test]
    fn test_end_bound_is_month_start() {
        // 12.2024 maps to Dec 1, not Dec 31
        let dec = MonthYear::parse("12.2024").unwrap();
        let dec_first = NaiveDate::from_ymd_opt(2024, 12, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(dec.epoch_ms(), dec_first);
    }

    #[test]
    fn test_epoch_range_tolerates_empty_and_garbage() {
        assert_eq!(epoch_range("", ""), [0, 0]);
        assert_eq!(epoch_range("garbage", "01.1970"), [0, 0]);

        let [start, end] = epoch_range("01.2024", "12.2024");
        assert_eq!(start, 1_704_067_200_000);
        assert!(end > start);
    }

    #[test]
    fn test_epoch_range_passes_reversed_chronology_through() {
        let [start, end] = epoch_range("12.2024", "01.2024");
        assert!(start > end);
    }

    #[test]
    fn test_next_and_prev_carry_years() {
        let dec = MonthYear::parse("12.2023").unwrap();
        assert_eq!(dec.next().to_string(), "01.2024");

        let jan = MonthYear::parse("01.2024").unwrap();
        assert_eq!(jan.prev().to_string(), "12.2023");

        let june = MonthYear::parse("06.2024").unwrap();
        assert_eq!(june.next().to_string(), "07.2024");
        assert_eq!(june.prev().to_string(), "05.2024");
    }

    #[test]
    fn test_new_validates() {
        assert!(MonthYear::new(13, 2024).is_err());
        assert!(MonthYear::new(0, 2024).is_err());
        assert!(MonthYear::new(6, 0).is_err());
        assert!(MonthYear::new(6, 2024).is_ok());
    }
}
