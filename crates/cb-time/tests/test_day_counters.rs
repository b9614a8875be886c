//! Integration tests for the day-count conventions used by the discount
//! curves and catastrophe simulators.

use cb_time::{Actual360, Actual365Fixed, ActualActualIsda, Date, DayCounter};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

// ─── Actual/Actual ────────────────────────────────────────────────────────────

/// ISDA reference cases: (start, end, expected year fraction).
#[test]
fn test_actual_actual_isda() {
    let dc = ActualActualIsda;

    let cases: Vec<(Date, Date, f64)> = vec![
        (date(2003, 11, 1), date(2004, 5, 1), 0.497724380567),
        (date(1999, 2, 1), date(1999, 7, 1), 0.410958904110),
        (date(1999, 7, 1), date(2000, 7, 1), 1.001377348600),
        (date(2002, 8, 15), date(2003, 7, 15), 0.915068493151),
        (date(2003, 7, 15), date(2004, 1, 15), 0.504004790778),
        (date(1999, 7, 30), date(2000, 1, 30), 0.503892506924),
        (date(2000, 1, 30), date(2000, 6, 30), 0.415300546448),
    ];

    for (i, (d1, d2, expected)) in cases.iter().enumerate() {
        let calculated = dc.year_fraction(*d1, *d2);
        assert!(
            (calculated - expected).abs() < 1.0e-10,
            "ISDA case {i}: from {d1} to {d2}: calculated {calculated:.12}, expected {expected:.12}"
        );
    }
}

#[test]
fn test_actual_actual_isda_whole_years() {
    let dc = ActualActualIsda;
    assert!((dc.year_fraction(date(2015, 1, 2), date(2018, 1, 2)) - 3.0).abs() < 1e-12);
    assert!((dc.year_fraction(date(2016, 3, 1), date(2020, 3, 1)) - 4.0).abs() < 1e-12);
}

// ─── Actual/365 and Actual/360 ────────────────────────────────────────────────

#[test]
fn test_simple_conventions() {
    let (d1, d2) = (date(2024, 1, 15), date(2024, 7, 15));
    assert_eq!(Actual365Fixed.day_count(d1, d2), 182);
    assert!((Actual365Fixed.year_fraction(d1, d2) - 182.0 / 365.0).abs() < 1e-15);
    assert!((Actual360.year_fraction(d1, d2) - 182.0 / 360.0).abs() < 1e-15);
    assert_eq!(Actual365Fixed.name(), "Actual/365 (Fixed)");
}

proptest! {
    #[test]
    fn year_fraction_is_additive(a in 0i64..20_000, b in 0i64..20_000, c in 0i64..20_000) {
        let base = date(1990, 1, 1);
        let mut offs = [a, b, c];
        offs.sort_unstable();
        let (d1, d2, d3) = (
            base.add_days(offs[0]).unwrap(),
            base.add_days(offs[1]).unwrap(),
            base.add_days(offs[2]).unwrap(),
        );
        for dc in [&ActualActualIsda as &dyn DayCounter, &Actual365Fixed, &Actual360] {
            let whole = dc.year_fraction(d1, d3);
            let split = dc.year_fraction(d1, d2) + dc.year_fraction(d2, d3);
            prop_assert!((whole - split).abs() < 1e-9);
        }
    }
}
