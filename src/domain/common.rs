use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// A calendar month addressed by year and zero-based month index.
///
/// The zero-based month mirrors calendar arithmetic (`0` is January, `11` is
/// December). Text conversions use the conventional one-based `YYYY-MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    year: i32,
    month0: u32,
}

impl YearMonth {
    /// Builds a month from a year and a zero-based month index.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        if month0 > 11 {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
        Some(Self { year, month0 })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index.
    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// One-based month number, as printed on calendars.
    pub fn month(&self) -> u32 {
        self.month0 + 1
    }

    /// Nominal calendar-date membership; no timezone conversion applies.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn first_day(&self) -> NaiveDate {
        // Range checked in `new`; day 1 always exists.
        NaiveDate::from_ymd_opt(self.year, self.month(), 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next().first_day();
        next.signed_duration_since(self.first_day()).num_days() as u32
    }

    pub fn previous(&self) -> Self {
        if self.month0 == 0 {
            Self {
                year: self.year - 1,
                month0: 11,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month0 == 11 {
            Self {
                year: self.year + 1,
                month0: 0,
            }
        } else {
            Self {
                year: self.year,
                month0: self.month0 + 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}

/// Error returned when a `YYYY-MM` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month `{0}`, expected YYYY-MM")]
pub struct ParseYearMonthError(pub String);

impl FromStr for YearMonth {
    type Err = ParseYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseYearMonthError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        if month == 0 {
            return Err(err());
        }
        YearMonth::new(year, month - 1).ok_or_else(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps_year_boundaries() {
        let january = YearMonth::new(2024, 0).unwrap();
        assert_eq!(january.previous(), YearMonth::new(2023, 11).unwrap());
        let december = YearMonth::new(2024, 11).unwrap();
        assert_eq!(december.next(), YearMonth::new(2025, 0).unwrap());
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(YearMonth::new(2024, 12).is_none());
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-00".parse::<YearMonth>().is_err());
    }

    #[test]
    fn parses_and_displays_one_based_text() {
        let month: YearMonth = "2024-05".parse().unwrap();
        assert_eq!(month.month0(), 4);
        assert_eq!(month.to_string(), "2024-05");
    }

    #[test]
    fn counts_leap_february() {
        assert_eq!(YearMonth::new(2024, 1).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2023, 1).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2023, 11).unwrap().days_in_month(), 31);
    }

    #[test]
    fn contains_matches_year_and_month_only() {
        let may = YearMonth::new(2024, 4).unwrap();
        assert!(may.contains(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()));
        assert!(!may.contains(NaiveDate::from_ymd_opt(2023, 5, 10).unwrap()));
        assert!(!may.contains(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
    }
}
