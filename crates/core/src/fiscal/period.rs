//! Fiscal period types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fiscal year and month a record is attributed to for reporting.
///
/// Derived from the business date at write time and never recomputed
/// implicitly; editing a pending record's date re-derives the stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalStamp {
    /// Calendar year.
    pub year: i32,
    /// Month within the year (1-12).
    pub period: u8,
}

impl FiscalStamp {
    /// Derives the fiscal stamp from a business date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self {
            year: date.year(),
            period: date.month() as u8,
        }
    }
}

/// A payroll period token in `MM/YYYY` form (e.g. "01/2024").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Month (1-12).
    pub month: u8,
    /// Calendar year.
    pub year: i32,
}

impl PayrollPeriod {
    /// Parses a `MM/YYYY` token.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (month_part, year_part) = s.split_once('/')?;
        if month_part.len() != 2 || year_part.len() != 4 {
            return None;
        }
        let month: u8 = month_part.parse().ok()?;
        let year: i32 = year_part.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { month, year })
    }

    /// Returns the fiscal stamp for this period.
    #[must_use]
    pub const fn fiscal_stamp(&self) -> FiscalStamp {
        FiscalStamp {
            year: self.year,
            period: self.month,
        }
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fiscal_stamp_from_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let stamp = FiscalStamp::from_date(date);
        assert_eq!(stamp.year, 2024);
        assert_eq!(stamp.period, 3);
    }

    #[test]
    fn test_fiscal_stamp_year_boundaries() {
        let jan = FiscalStamp::from_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!((jan.year, jan.period), (2025, 1));
        let dec = FiscalStamp::from_date(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!((dec.year, dec.period), (2024, 12));
    }

    #[test]
    fn test_payroll_period_parse() {
        let p = PayrollPeriod::parse("01/2024").expect("valid period");
        assert_eq!(p.month, 1);
        assert_eq!(p.year, 2024);
        assert_eq!(p.to_string(), "01/2024");
    }

    #[test]
    fn test_payroll_period_rejects_invalid() {
        assert_eq!(PayrollPeriod::parse("13/2024"), None);
        assert_eq!(PayrollPeriod::parse("00/2024"), None);
        assert_eq!(PayrollPeriod::parse("1/2024"), None);
        assert_eq!(PayrollPeriod::parse("01-2024"), None);
        assert_eq!(PayrollPeriod::parse("01/24"), None);
        assert_eq!(PayrollPeriod::parse(""), None);
    }

    #[test]
    fn test_payroll_period_fiscal_stamp() {
        let p = PayrollPeriod::parse("11/2023").unwrap();
        let stamp = p.fiscal_stamp();
        assert_eq!(stamp.year, 2023);
        assert_eq!(stamp.period, 11);
    }
}
