//! Fixed-rate coupons and leg builders.

use crate::cashflow::{CashFlow, Leg, Redemption};
use cb_core::{ensure, errors::Result, Rate, Real, Time};
use cb_time::{Actual365Fixed, Date, DayCounter};
use std::sync::Arc;

/// A coupon paying simple interest at a fixed rate over its accrual period.
///
/// `amount = nominal · rate · τ(accrual_start, accrual_end)`.
#[derive(Debug, Clone)]
pub struct FixedRateCoupon {
    nominal: Real,
    payment_date: Date,
    rate: Rate,
    accrual_start: Date,
    accrual_end: Date,
    accrual_period: Time,
}

impl FixedRateCoupon {
    /// Create a coupon accruing from `accrual_start` to `accrual_end` and
    /// paid on `payment_date`.
    pub fn new(
        payment_date: Date,
        nominal: Real,
        rate: Rate,
        day_counter: &dyn DayCounter,
        accrual_start: Date,
        accrual_end: Date,
    ) -> Self {
        Self {
            nominal,
            payment_date,
            rate,
            accrual_start,
            accrual_end,
            accrual_period: day_counter.year_fraction(accrual_start, accrual_end),
        }
    }

    /// Notional the interest accrues on.
    pub fn nominal(&self) -> Real {
        self.nominal
    }

    /// The annual coupon rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// Start of the accrual period.
    pub fn accrual_start_date(&self) -> Date {
        self.accrual_start
    }

    /// End of the accrual period.
    pub fn accrual_end_date(&self) -> Date {
        self.accrual_end
    }

    /// The accrual period in years.
    pub fn accrual_period(&self) -> Time {
        self.accrual_period
    }
}

impl CashFlow for FixedRateCoupon {
    fn date(&self) -> Date {
        self.payment_date
    }

    fn amount(&self) -> Real {
        self.nominal * self.rate * self.accrual_period
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed-rate leg builder
// ────────────────────────────────────────────────────────────────────────────

/// Build a fixed-rate leg over consecutive accrual periods.
///
/// Each pair of adjacent `dates` delimits one period, paid at its end.
pub struct FixedRateLegBuilder {
    dates: Vec<Date>,
    nominal: Real,
    coupon_rate: Rate,
    day_counter: Box<dyn DayCounter>,
    redemption: Option<Real>,
}

impl FixedRateLegBuilder {
    /// Create a builder from period boundary dates.
    pub fn new(dates: Vec<Date>) -> Self {
        Self {
            dates,
            nominal: 100.0,
            coupon_rate: 0.0,
            day_counter: Box::new(Actual365Fixed),
            redemption: None,
        }
    }

    /// Set the notional.
    pub fn with_nominal(mut self, nominal: Real) -> Self {
        self.nominal = nominal;
        self
    }

    /// Set the coupon rate for all periods.
    pub fn with_coupon_rate(mut self, rate: Rate) -> Self {
        self.coupon_rate = rate;
        self
    }

    /// Set the accrual day counter.
    pub fn with_day_counter(mut self, dc: impl DayCounter + 'static) -> Self {
        self.day_counter = Box::new(dc);
        self
    }

    /// Repay the notional at the last date.
    pub fn with_redemption(mut self) -> Self {
        self.redemption = Some(self.nominal);
        self
    }

    /// Build the leg.
    pub fn build(self) -> Result<Leg> {
        ensure!(
            self.dates.len() >= 2,
            "at least two dates are needed to build a fixed-rate leg"
        );
        ensure!(
            self.dates.windows(2).all(|w| w[0] < w[1]),
            "leg dates must be strictly increasing"
        );
        let mut leg: Leg = self
            .dates
            .windows(2)
            .map(|w| {
                Arc::new(FixedRateCoupon::new(
                    w[1],
                    self.nominal,
                    self.coupon_rate,
                    &*self.day_counter,
                    w[0],
                    w[1],
                )) as Arc<dyn CashFlow>
            })
            .collect();
        if let (Some(amount), Some(&last)) = (self.redemption, self.dates.last()) {
            leg.push(Arc::new(Redemption::new(amount, last)));
        }
        Ok(leg)
    }
}
