//! Report window (target year and month)

use std::fmt;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid year: {0}")]
    InvalidYear(i32),
}

/// The calendar month a digest covers
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportWindow {
    pub year: i32,
    pub month: u32,
}

impl ReportWindow {
    pub fn new(year: i32, month: u32) -> Result<Self, WindowError> {
        if !(1..=12).contains(&month) {
            return Err(WindowError::InvalidMonth(month));
        }
        if year < 0 {
            return Err(WindowError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// The calendar month before the one containing `today`
    pub fn previous_month(today: NaiveDate) -> Self {
        if today.month() == 1 {
            Self {
                year: today.year() - 1,
                month: 12,
            }
        } else {
            Self {
                year: today.year(),
                month: today.month() - 1,
            }
        }
    }

    /// Use an explicit (year, month) if given, else the previous month
    pub fn resolve(explicit: Option<(i32, u32)>, today: NaiveDate) -> Result<Self, WindowError> {
        match explicit {
            Some((year, month)) => Self::new(year, month),
            None => Ok(Self::previous_month(today)),
        }
    }

    /// `YYYY-MM`, as used in ADS `pubdate:` clauses
    pub fn pubdate(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    /// `YYMM`, the prefix of new-style arXiv identifiers for this month
    pub fn arxiv_prefix(&self) -> String {
        format!("{:02}{:02}", self.year % 100, self.month)
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2024, 1, 15), 2023, 12)]
    #[case(date(2024, 2, 1), 2024, 1)]
    #[case(date(2024, 12, 31), 2024, 11)]
    #[case(date(2000, 1, 1), 1999, 12)]
    fn test_previous_month(#[case] today: NaiveDate, #[case] year: i32, #[case] month: u32) {
        assert_eq!(
            ReportWindow::previous_month(today),
            ReportWindow { year, month }
        );
    }

    #[test]
    fn test_resolve_explicit() {
        let w = ReportWindow::resolve(Some((2021, 7)), date(2024, 1, 15)).unwrap();
        assert_eq!(w, ReportWindow { year: 2021, month: 7 });
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(ReportWindow::new(2024, 13), Err(WindowError::InvalidMonth(13)));
        assert_eq!(ReportWindow::new(2024, 0), Err(WindowError::InvalidMonth(0)));
    }

    #[test]
    fn test_query_fragments() {
        let w = ReportWindow::new(2024, 3).unwrap();
        assert_eq!(w.pubdate(), "2024-03");
        assert_eq!(w.arxiv_prefix(), "2403");

        let w = ReportWindow::new(2009, 11).unwrap();
        assert_eq!(w.arxiv_prefix(), "0911");
    }
}
