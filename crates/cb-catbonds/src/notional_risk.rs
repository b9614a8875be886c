//! Risky notional models for catastrophe bonds.
//!
//! These map the catastrophe events of one path onto the bond's surviving
//! notional:
//! - `DigitalNotionalRisk`: notional drops to 0 once cumulative loss reaches a threshold
//! - `ProportionalNotionalRisk`: notional reduces linearly between attachment and exhaustion

use crate::cat_risk::CatEvent;
use cb_core::{ensure, errors::Result, Natural, Real};
use cb_time::Date;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── NotionalPath ──────────────────────────────────────────────────────────────

/// The surviving fraction of notional over time along one simulated path.
///
/// Starts at 1 and only ever decreases.  A path built with a horizon ignores
/// reductions taking effect after it, so `loss()` always equals
/// `1 - notional_rate(horizon)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotionalPath {
    /// (date, rate from that date on), dates non-decreasing, rates non-increasing.
    reductions: Vec<(Date, Real)>,
    horizon: Option<Date>,
}

impl NotionalPath {
    /// A path with the full notional outstanding at every date.
    pub fn new() -> Self {
        Self::default()
    }

    /// A path that only records reductions effective on or before `horizon`.
    pub fn with_horizon(horizon: Date) -> Self {
        Self {
            reductions: Vec::new(),
            horizon: Some(horizon),
        }
    }

    /// The last date a reduction can take effect, if bounded.
    pub fn horizon(&self) -> Option<Date> {
        self.horizon
    }

    /// Restore the full notional, keeping the allocation and the horizon.
    pub fn reset(&mut self) {
        self.reductions.clear();
    }

    /// Reduce the surviving rate to `new_rate` from `date` on.
    ///
    /// The rate is clamped to `[0, current rate]`, so a reduction can never
    /// restore notional.  Reductions must be added in date order; those
    /// past the horizon are dropped.
    pub fn add_reduction(&mut self, date: Date, new_rate: Real) -> Result<()> {
        if let Some(&(last, _)) = self.reductions.last() {
            ensure!(
                date >= last,
                "notional reduction on {date} precedes the previous one on {last}"
            );
        }
        ensure!(!new_rate.is_nan(), "notional rate on {date} is NaN");
        if self.horizon.is_some_and(|horizon| date > horizon) {
            return Ok(());
        }
        let rate = new_rate.clamp(0.0, self.final_rate());
        self.reductions.push((date, rate));
        Ok(())
    }

    /// The surviving notional fraction on `date`.
    pub fn notional_rate(&self, date: Date) -> Real {
        match self.reductions.partition_point(|&(d, _)| d <= date) {
            0 => 1.0,
            n => self.reductions[n - 1].1,
        }
    }

    /// Fraction of the notional lost by the end of the path.
    pub fn loss(&self) -> Real {
        1.0 - self.final_rate()
    }

    /// The recorded reductions, in date order.
    pub fn reductions(&self) -> &[(Date, Real)] {
        &self.reductions
    }

    fn final_rate(&self) -> Real {
        self.reductions.last().map_or(1.0, |&(_, r)| r)
    }
}

// ── EventPaymentOffset ────────────────────────────────────────────────────────

/// When a notional reduction takes effect relative to its triggering event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPaymentOffset {
    /// On the event date.
    #[default]
    NoOffset,
    /// The given number of calendar days after the event.
    DaysOffset(Natural),
}

impl EventPaymentOffset {
    /// The date a reduction triggered on `event_date` takes effect.
    pub fn payment_date(&self, event_date: Date) -> Result<Date> {
        match *self {
            EventPaymentOffset::NoOffset => Ok(event_date),
            EventPaymentOffset::DaysOffset(days) => event_date.add_days(i64::from(days)),
        }
    }
}

// ── NotionalRisk ──────────────────────────────────────────────────────────────

/// Rule turning a path's catastrophe events into notional reductions.
///
/// Implementations must be pure functions of the events: `update_path`
/// resets `path` before applying them.
pub trait NotionalRisk: fmt::Debug + Send + Sync {
    /// Rebuild `path` from `events` (sorted by date).
    fn update_path(&self, events: &[CatEvent], path: &mut NotionalPath) -> Result<()>;
}

// ── DigitalNotionalRisk ───────────────────────────────────────────────────────

/// Binary wipe-out: once cumulative loss reaches `threshold` the notional
/// is lost entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalNotionalRisk {
    payment_offset: EventPaymentOffset,
    threshold: Real,
}

impl DigitalNotionalRisk {
    /// Create a digital rule triggering at `threshold` cumulative loss.
    pub fn new(payment_offset: EventPaymentOffset, threshold: Real) -> Self {
        Self {
            payment_offset,
            threshold,
        }
    }

    /// The triggering cumulative loss.
    pub fn threshold(&self) -> Real {
        self.threshold
    }
}

impl NotionalRisk for DigitalNotionalRisk {
    fn update_path(&self, events: &[CatEvent], path: &mut NotionalPath) -> Result<()> {
        path.reset();
        let mut losses = 0.0;
        for &(date, loss) in events {
            losses += loss;
            if losses >= self.threshold {
                path.add_reduction(self.payment_offset.payment_date(date)?, 0.0)?;
                break;
            }
        }
        Ok(())
    }
}

// ── ProportionalNotionalRisk ──────────────────────────────────────────────────

/// Linear write-down between `attachment` and `exhaustion`.
///
/// - cumulative loss up to `attachment`: no reduction
/// - at or past `exhaustion`: notional is zero
/// - between: `remaining = (exhaustion − L) / (exhaustion − attachment)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionalNotionalRisk {
    payment_offset: EventPaymentOffset,
    attachment: Real,
    exhaustion: Real,
}

impl ProportionalNotionalRisk {
    /// Create a proportional rule; requires `attachment < exhaustion`.
    pub fn new(
        payment_offset: EventPaymentOffset,
        attachment: Real,
        exhaustion: Real,
    ) -> Result<Self> {
        ensure!(
            attachment < exhaustion,
            "exhaustion level ({exhaustion}) must be greater than attachment point ({attachment})"
        );
        Ok(Self {
            payment_offset,
            attachment,
            exhaustion,
        })
    }

    /// Cumulative loss at which the write-down starts.
    pub fn attachment(&self) -> Real {
        self.attachment
    }

    /// Cumulative loss at which the notional is exhausted.
    pub fn exhaustion(&self) -> Real {
        self.exhaustion
    }
}

impl NotionalRisk for ProportionalNotionalRisk {
    fn update_path(&self, events: &[CatEvent], path: &mut NotionalPath) -> Result<()> {
        path.reset();
        let mut losses = 0.0;
        let mut previous_notional = 1.0;
        for &(date, loss) in events {
            losses += loss;
            if losses > self.attachment && previous_notional > 0.0 {
                previous_notional =
                    ((self.exhaustion - losses) / (self.exhaustion - self.attachment)).max(0.0);
                path.add_reduction(self.payment_offset.payment_date(date)?, previous_notional)?;
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
