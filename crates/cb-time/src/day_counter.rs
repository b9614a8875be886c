//! `DayCounter` trait and the day-count conventions used by the discount
//! curves and catastrophe simulators.
//!
//! A day counter computes the **day count fraction**, the fraction of a year
//! between two dates used when discounting or spreading event arrivals.

use crate::date::{days_in_year, Date};
use cb_core::{Real, Time};

/// A convention for counting the fraction of a year between two dates.
pub trait DayCounter: std::fmt::Debug + Send + Sync {
    /// Human-readable name of this convention (e.g. `"Actual/365 (Fixed)"`).
    fn name(&self) -> &str;

    /// Number of days between `d1` and `d2` according to this convention.
    fn day_count(&self, d1: Date, d2: Date) -> i64 {
        d1.days_until(d2)
    }

    /// Fraction of a year between `d1` and `d2`.
    fn year_fraction(&self, d1: Date, d2: Date) -> Time;
}

/// Actual/365 (Fixed): `actual_days / 365`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual365Fixed;

impl DayCounter for Actual365Fixed {
    fn name(&self) -> &str {
        "Actual/365 (Fixed)"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 365.0
    }
}

/// Actual/360: `actual_days / 360`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actual360;

impl DayCounter for Actual360 {
    fn name(&self) -> &str {
        "Actual/360"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        self.day_count(d1, d2) as Real / 360.0
    }
}

/// Actual/Actual (ISDA).
///
/// The period is split at year boundaries; each piece is divided by the
/// length of its own year (365 or 366).
#[derive(Debug, Clone, Copy, Default)]
pub struct ActualActualIsda;

impl DayCounter for ActualActualIsda {
    fn name(&self) -> &str {
        "Actual/Actual (ISDA)"
    }

    fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        if d1 == d2 {
            return 0.0;
        }
        if d1 > d2 {
            return -self.year_fraction(d2, d1);
        }
        let (y1, y2) = (d1.year(), d2.year());
        let start_of = |y: i32| Date::from_ymd(y, 1, 1);
        let (Ok(next_y1), Ok(start_y2)) = (start_of(y1 + 1), start_of(y2)) else {
            // outside chrono's range; fall back to a 365.25-day year
            return self.day_count(d1, d2) as Real / 365.25;
        };
        if y1 == y2 {
            return self.day_count(d1, d2) as Real / days_in_year(y1) as Real;
        }
        let head = self.day_count(d1, next_y1) as Real / days_in_year(y1) as Real;
        let tail = self.day_count(start_y2, d2) as Real / days_in_year(y2) as Real;
        head + (y2 - y1 - 1) as Real + tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn actual365_fixed() {
        let dc = Actual365Fixed;
        assert_eq!(dc.day_count(date(2023, 1, 1), date(2024, 1, 1)), 365);
        assert!((dc.year_fraction(date(2023, 1, 1), date(2024, 1, 1)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn actual360() {
        let dc = Actual360;
        let yf = dc.year_fraction(date(2023, 1, 1), date(2023, 7, 1));
        assert!((yf - 181.0 / 360.0).abs() < 1e-12);
    }

    #[test]
    fn actual_actual_isda_is_antisymmetric() {
        let dc = ActualActualIsda;
        let (a, b) = (date(2015, 1, 2), date(2018, 1, 2));
        assert!((dc.year_fraction(a, b) + dc.year_fraction(b, a)).abs() < 1e-15);
    }
}
