//! `Date` type.
//!
//! A checked calendar date.  Storage and calendar arithmetic are delegated
//! to `chrono::NaiveDate`; this wrapper adds the fallible constructors and
//! the handful of operations the valuation code needs (day / year shifts,
//! weekday stepping, day differences).

use cb_core::errors::{Error, Result};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A calendar date.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Earliest representable date.
    pub const MIN: Date = Date(NaiveDate::MIN);

    /// Latest representable date.
    pub const MAX: Date = Date(NaiveDate::MAX);

    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from year, month (1–12), and day-of-month (1–31).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| Error::Date(format!("invalid date {year}-{month:02}-{day:02}")))
    }

    /// Like [`from_ymd`](Self::from_ymd), but a day past the end of the
    /// month is moved back to the month's last day (so 29 February lands on
    /// 28 February in non-leap years).
    pub fn from_ymd_clamped(year: i32, month: u32, day: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Date(format!("month {month} out of range [1, 12]")));
        }
        Self::from_ymd(year, month, day.min(days_in_month(year, month)))
    }

    /// Today's date in the local time zone.
    pub fn today() -> Self {
        Date(chrono::Local::now().date_naive())
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The month (1–12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The day of the month (1–31).
    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    /// The day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Whether the date falls on a Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// The underlying `chrono` date.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Shift by `n` calendar days (negative moves backwards).
    pub fn add_days(self, n: i64) -> Result<Self> {
        let shifted = if n >= 0 {
            self.0.checked_add_days(Days::new(n.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(n.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| Error::Date(format!("{self} shifted by {n} days is out of range")))
    }

    /// Shift by `n` years, clamping to the end of the month when needed.
    pub fn add_years(self, n: i32) -> Result<Self> {
        let months = Months::new(12 * n.unsigned_abs());
        let shifted = if n >= 0 {
            self.0.checked_add_months(months)
        } else {
            self.0.checked_sub_months(months)
        };
        shifted
            .map(Date)
            .ok_or_else(|| Error::Date(format!("{self} shifted by {n} years is out of range")))
    }

    /// Advance by `n` weekdays (Monday–Friday); holidays are not modelled.
    ///
    /// A weekend start date first rolls forward to Monday when `n > 0`.
    pub fn add_weekdays(self, n: u32) -> Result<Self> {
        let mut d = self;
        let mut remaining = n;
        while remaining > 0 {
            d = d.add_days(1)?;
            if !d.is_weekend() {
                remaining -= 1;
            }
        }
        Ok(d)
    }

    /// Number of calendar days from `self` to `other` (positive if `other`
    /// is later).
    pub fn days_until(self, other: Date) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }
}

impl std::ops::Sub<Date> for Date {
    type Output = i64;
    fn sub(self, rhs: Date) -> i64 {
        rhs.days_until(self)
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Date(d)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%B %-d, %Y"))
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date({})", self.0.format("%Y-%m-%d"))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Whether a given year is a leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month (1–12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Number of days in `year`.
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn invalid_dates_rejected() {
        assert!(Date::from_ymd(2023, 2, 29).is_err());
        assert!(Date::from_ymd(2023, 13, 1).is_err());
        assert!(Date::from_ymd(2024, 2, 29).is_ok());
    }

    #[test]
    fn clamped_construction() {
        assert_eq!(Date::from_ymd_clamped(2023, 2, 29).unwrap(), date(2023, 2, 28));
        assert_eq!(Date::from_ymd_clamped(2024, 4, 31).unwrap(), date(2024, 4, 30));
        assert!(Date::from_ymd_clamped(2024, 0, 1).is_err());
    }

    #[test]
    fn day_arithmetic() {
        let d = date(2023, 1, 1);
        assert_eq!(d.add_days(31).unwrap(), date(2023, 2, 1));
        assert_eq!(d.add_days(-1).unwrap(), date(2022, 12, 31));
        assert_eq!(date(2023, 2, 1) - d, 31);
        assert_eq!(d.days_until(date(2022, 12, 25)), -7);
    }

    #[test]
    fn year_arithmetic_clamps_leap_day() {
        assert_eq!(date(2024, 2, 29).add_years(1).unwrap(), date(2025, 2, 28));
        assert_eq!(date(2024, 2, 29).add_years(-4).unwrap(), date(2020, 2, 29));
    }

    #[test]
    fn weekday_stepping() {
        // Friday 2024-01-05 + 1 weekday = Monday 2024-01-08
        assert_eq!(date(2024, 1, 5).add_weekdays(1).unwrap(), date(2024, 1, 8));
        // Saturday + 2 weekdays = Tuesday
        assert_eq!(date(2024, 1, 6).add_weekdays(2).unwrap(), date(2024, 1, 9));
        assert_eq!(date(2024, 1, 6).add_weekdays(0).unwrap(), date(2024, 1, 6));
    }

    #[test]
    fn formatting() {
        let d = date(2025, 3, 7);
        assert_eq!(d.to_string(), "March 7, 2025");
        assert_eq!(format!("{d:?}"), "Date(2025-03-07)");
    }
}
