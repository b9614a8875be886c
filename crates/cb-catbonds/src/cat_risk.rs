//! Catastrophe risk models.
//!
//! A [`CatRisk`] produces [`CatSimulation`] streams of event paths over a
//! period:
//! - [`EventSet`]: deterministic replay of a historical event catalogue
//! - [`BetaRisk`]: Poisson arrivals with Beta-distributed losses

use cb_core::{ensure, errors::Error, errors::Result, Real};
use cb_time::{ActualActualIsda, Date, DayCounter};
use rand::prelude::*;
use rand_distr::{Exp, Gamma};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

// ── Traits ────────────────────────────────────────────────────────────────────

/// A single catastrophe event: (date, loss amount).
pub type CatEvent = (Date, Real);

/// A stream of simulated event paths over a fixed period.
pub trait CatSimulation: Send {
    /// Clear `path` and fill it with the next path's events, in date order.
    ///
    /// Returns `false` once the stream is exhausted; `path` is then empty.
    fn next_path(&mut self, path: &mut Vec<CatEvent>) -> bool;
}

/// A catastrophe risk model able to simulate arbitrary periods.
pub trait CatRisk: fmt::Debug + Send + Sync {
    /// Start a new simulation over `[start, end]`.
    fn new_simulation(&self, start: Date, end: Date) -> Result<Box<dyn CatSimulation>>;

    /// Start sub-stream `stream` of the simulation over `[start, end]`.
    ///
    /// Distinct streams draw from disjoint, reproducible regions of the
    /// model's randomness.  Models that cannot partition their randomness
    /// keep this default, which fails.
    fn new_sub_simulation(
        &self,
        _start: Date,
        _end: Date,
        stream: u64,
    ) -> Result<Box<dyn CatSimulation>> {
        Err(Error::Precondition(format!(
            "{self:?} does not support independent sub-streams (stream {stream} requested)"
        )))
    }
}

// ── EventSet ──────────────────────────────────────────────────────────────────

/// Deterministic event set: replays historical events shifted into the
/// simulation period, one catalogue window per path.
#[derive(Debug, Clone)]
pub struct EventSet {
    events: Arc<Vec<CatEvent>>,
    events_start: Date,
    events_end: Date,
}

impl EventSet {
    /// Create an event set from a catalogue covering `[events_start, events_end]`.
    ///
    /// Events are sorted by date.
    pub fn new(mut events: Vec<CatEvent>, events_start: Date, events_end: Date) -> Result<Self> {
        ensure!(
            events_start <= events_end,
            "catalogue start ({events_start}) after catalogue end ({events_end})"
        );
        events.sort_by_key(|&(d, _)| d);
        Ok(Self {
            events: Arc::new(events),
            events_start,
            events_end,
        })
    }
}

impl CatRisk for EventSet {
    fn new_simulation(&self, start: Date, end: Date) -> Result<Box<dyn CatSimulation>> {
        Ok(Box::new(EventSetSimulation::new(
            Arc::clone(&self.events),
            self.events_start,
            self.events_end,
            start,
            end,
        )?))
    }
}

/// Replays the windows of an [`EventSet`] catalogue.
#[derive(Debug)]
pub struct EventSetSimulation {
    events: Arc<Vec<CatEvent>>,
    events_end: Date,
    start: Date,
    end: Date,
    period_start: Date,
    period_end: Date,
    period_step: i32,
    i: usize,
}

impl EventSetSimulation {
    /// Create a replay of `events` for the simulation period `[start, end]`.
    pub fn new(
        events: Arc<Vec<CatEvent>>,
        events_start: Date,
        events_end: Date,
        start: Date,
        end: Date,
    ) -> Result<Self> {
        ensure!(start <= end, "simulation start ({start}) after end ({end})");
        let years = end.year() - start.year();

        // first catalogue date with the same month/day as `start`
        let same_year = (events_start.month(), events_start.day_of_month())
            <= (start.month(), start.day_of_month());
        let first_year = if same_year {
            events_start.year()
        } else {
            events_start.year() + 1
        };
        let period_start = Date::from_ymd_clamped(first_year, start.month(), start.day_of_month())?;
        let period_end =
            Date::from_ymd_clamped(first_year + years, end.month(), end.day_of_month())?;

        // a period longer than whole years moves on by one extra year
        let period_step = if start.add_years(years)? < end {
            years + 1
        } else {
            years
        };

        let i = events.partition_point(|&(d, _)| d < period_start);
        Ok(Self {
            events,
            events_end,
            start,
            end,
            period_start,
            period_end,
            period_step,
            i,
        })
    }
}

impl EventSetSimulation {
    /// Move a catalogue date by `year_shift` years into the simulation period.
    ///
    /// Feb 29 lands on Feb 28 in non-leap target years.
    fn shift(&self, date: Date, year_shift: i32) -> Result<Date> {
        let year = date
            .year()
            .checked_add(year_shift)
            .ok_or_else(|| Error::Date(format!("cannot shift {date} by {year_shift} years")))?;
        let shifted = Date::from_ymd_clamped(year, date.month(), date.day_of_month())?;
        Ok(shifted.clamp(self.start, self.end))
    }
}

impl CatSimulation for EventSetSimulation {
    fn next_path(&mut self, path: &mut Vec<CatEvent>) -> bool {
        path.clear();
        if self.period_end > self.events_end {
            return false;
        }

        while self.i < self.events.len() && self.events[self.i].0 < self.period_start {
            self.i += 1;
        }

        let year_shift = self.start.year() - self.period_start.year();
        while self.i < self.events.len() && self.events[self.i].0 <= self.period_end {
            let (date, loss) = self.events[self.i];
            match self.shift(date, year_shift) {
                Ok(shifted) => path.push((shifted, loss)),
                Err(e) => debug!(%date, year_shift, "skipping catalogue event: {e}"),
            }
            self.i += 1;
        }

        match (
            self.period_start.add_years(self.period_step),
            self.period_end.add_years(self.period_step),
        ) {
            (Ok(s), Ok(e)) => {
                self.period_start = s;
                self.period_end = e;
            }
            // past the representable range: nothing left to replay
            _ => self.period_end = Date::MAX,
        }
        true
    }
}

// ── BetaRisk ──────────────────────────────────────────────────────────────────

/// Seed used by [`BetaRisk`] unless overridden.
pub const DEFAULT_SEED: u64 = 42;

/// Stochastic catastrophe risk model: Poisson arrival of events with
/// Beta-distributed loss severities scaled to `max_loss`.
#[derive(Debug, Clone)]
pub struct BetaRisk {
    max_loss: Real,
    lambda: Real,
    alpha: Real,
    beta: Real,
    seed: u64,
}

impl BetaRisk {
    /// Create a Beta risk model.
    ///
    /// - `max_loss`: maximum possible loss per event
    /// - `years`: expected years between events (Poisson rate `1/years`)
    /// - `mean`: expected loss per event
    /// - `std_dev`: standard deviation of the loss per event
    pub fn new(max_loss: Real, years: Real, mean: Real, std_dev: Real) -> Result<Self> {
        ensure!(max_loss > 0.0, "max loss ({max_loss}) must be positive");
        ensure!(years > 0.0, "years between events ({years}) must be positive");
        ensure!(
            mean > 0.0 && mean < max_loss,
            "mean {mean} must lie in (0, max loss {max_loss})"
        );
        ensure!(std_dev > 0.0, "standard deviation ({std_dev}) must be positive");

        let normalized_mean = mean / max_loss;
        let normalized_var = std_dev * std_dev / (max_loss * max_loss);
        ensure!(
            normalized_var < normalized_mean * (1.0 - normalized_mean),
            "standard deviation {std_dev} is impossible for a Beta with mean {mean}"
        );
        let nu = normalized_mean * (1.0 - normalized_mean) / normalized_var - 1.0;

        Ok(Self {
            max_loss,
            lambda: 1.0 / years,
            alpha: normalized_mean * nu,
            beta: (1.0 - normalized_mean) * nu,
            seed: DEFAULT_SEED,
        })
    }

    /// Use `seed` for the random stream instead of [`DEFAULT_SEED`].
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The fitted Beta shape parameters `(alpha, beta)`.
    pub fn shape(&self) -> (Real, Real) {
        (self.alpha, self.beta)
    }

    fn simulation(&self, start: Date, end: Date, seed: u64) -> Result<BetaRiskSimulation> {
        ensure!(start <= end, "simulation start ({start}) after end ({end})");
        let invalid = |e: &dyn fmt::Display| Error::InvalidArgument(e.to_string());
        Ok(BetaRiskSimulation {
            start,
            end,
            max_loss: self.max_loss,
            day_count: ActualActualIsda.day_count(start, end),
            year_fraction: ActualActualIsda.year_fraction(start, end),
            rng: StdRng::seed_from_u64(seed),
            exponential: Exp::new(self.lambda).map_err(|e| invalid(&e))?,
            gamma_alpha: Gamma::new(self.alpha, 1.0).map_err(|e| invalid(&e))?,
            gamma_beta: Gamma::new(self.beta, 1.0).map_err(|e| invalid(&e))?,
        })
    }
}

impl CatRisk for BetaRisk {
    fn new_simulation(&self, start: Date, end: Date) -> Result<Box<dyn CatSimulation>> {
        Ok(Box::new(self.simulation(start, end, self.seed)?))
    }

    fn new_sub_simulation(
        &self,
        start: Date,
        end: Date,
        stream: u64,
    ) -> Result<Box<dyn CatSimulation>> {
        Ok(Box::new(self.simulation(start, end, stream_seed(self.seed, stream))?))
    }
}

/// Seed of sub-stream `stream` derived from `base`.
pub fn stream_seed(base: u64, stream: u64) -> u64 {
    splitmix64(base ^ splitmix64(stream.wrapping_add(1)))
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Monte Carlo simulation of a [`BetaRisk`] model.
#[derive(Debug)]
pub struct BetaRiskSimulation {
    start: Date,
    end: Date,
    max_loss: Real,
    day_count: i64,
    year_fraction: Real,
    rng: StdRng,
    exponential: Exp<Real>,
    gamma_alpha: Gamma<Real>,
    gamma_beta: Gamma<Real>,
}

impl BetaRiskSimulation {
    fn generate_beta(&mut self) -> Real {
        let x: Real = self.gamma_alpha.sample(&mut self.rng);
        let y: Real = self.gamma_beta.sample(&mut self.rng);
        x * self.max_loss / (x + y)
    }
}

impl CatSimulation for BetaRiskSimulation {
    fn next_path(&mut self, path: &mut Vec<CatEvent>) -> bool {
        path.clear();
        if self.year_fraction <= 0.0 {
            return true;
        }
        let mut event_fraction: Real = self.exponential.sample(&mut self.rng);
        while event_fraction <= self.year_fraction {
            let days =
                (event_fraction * self.day_count as Real / self.year_fraction).round() as i64;
            match self.start.add_days(days) {
                Ok(date) if date <= self.end => {
                    let loss = self.generate_beta();
                    path.push((date, loss));
                }
                _ => break,
            }
            event_fraction += self.exponential.sample(&mut self.rng);
        }
        true
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn catalogue() -> EventSet {
        let events = vec![
            (date(2013, 7, 1), 150.0),
            (date(2012, 2, 1), 100.0),
            (date(2014, 1, 5), 50.0),
        ];
        EventSet::new(events, date(2011, 1, 1), date(2014, 12, 31)).unwrap()
    }

    #[test]
    fn event_set_whole_years() {
        let mut sim = catalogue()
            .new_simulation(date(2015, 1, 1), date(2015, 12, 31))
            .unwrap();
        let mut path = Vec::new();

        assert!(sim.next_path(&mut path));
        assert!(path.is_empty());

        assert!(sim.next_path(&mut path));
        assert_eq!(path, vec![(date(2015, 2, 1), 100.0)]);

        assert!(sim.next_path(&mut path));
        assert_eq!(path, vec![(date(2015, 7, 1), 150.0)]);

        assert!(sim.next_path(&mut path));
        assert_eq!(path, vec![(date(2015, 1, 5), 50.0)]);

        assert!(!sim.next_path(&mut path));
        assert!(path.is_empty());
    }

    #[test]
    fn event_set_irregular_periods() {
        // periods are [2011-01-02, 2012-01-05] then [2013-01-02, 2014-01-05]
        let mut sim = catalogue()
            .new_simulation(date(2015, 1, 2), date(2016, 1, 5))
            .unwrap();
        let mut path = Vec::new();

        assert!(sim.next_path(&mut path));
        assert!(path.is_empty());

        assert!(sim.next_path(&mut path));
        assert_eq!(
            path,
            vec![(date(2015, 7, 1), 150.0), (date(2016, 1, 5), 50.0)]
        );

        assert!(!sim.next_path(&mut path));
    }

    #[test]
    fn event_set_no_events() {
        let set = EventSet::new(vec![], date(2011, 1, 1), date(2014, 12, 31)).unwrap();
        let mut sim = set.new_simulation(date(2015, 1, 2), date(2016, 1, 5)).unwrap();
        let mut path = Vec::new();

        assert!(sim.next_path(&mut path));
        assert!(path.is_empty());
        assert!(sim.next_path(&mut path));
        assert!(path.is_empty());
        assert!(!sim.next_path(&mut path));
    }

    #[test]
    fn event_set_leap_day_is_clamped() {
        let set = EventSet::new(
            vec![(date(2012, 2, 29), 10.0)],
            date(2012, 1, 1),
            date(2012, 12, 31),
        )
        .unwrap();
        let mut sim = set.new_simulation(date(2015, 1, 1), date(2015, 12, 31)).unwrap();
        let mut path = Vec::new();
        assert!(sim.next_path(&mut path));
        assert_eq!(path, vec![(date(2015, 2, 28), 10.0)]);
    }

    #[test]
    fn unshiftable_catalogue_dates_are_rejected() {
        let sim = EventSetSimulation::new(
            Arc::new(Vec::new()),
            date(2011, 1, 1),
            date(2014, 12, 31),
            date(2015, 1, 1),
            date(2015, 12, 31),
        )
        .unwrap();
        assert_eq!(sim.shift(date(2012, 2, 29), 3).unwrap(), date(2015, 2, 28));
        assert!(matches!(sim.shift(date(2012, 2, 1), i32::MAX), Err(Error::Date(_))));
        assert!(sim.shift(date(2012, 2, 1), 1_000_000).is_err());
    }

    #[test]
    fn event_set_has_no_sub_streams() {
        let result = catalogue().new_sub_simulation(date(2015, 1, 1), date(2015, 12, 31), 0);
        assert!(matches!(result, Err(Error::Precondition(_))));
    }

    #[test]
    fn beta_risk_rejects_infeasible_parameters() {
        assert!(BetaRisk::new(100.0, 100.0, 100.0, 15.0).is_err());
        assert!(BetaRisk::new(100.0, 100.0, 10.0, 50.0).is_err());
        assert!(BetaRisk::new(100.0, 0.0, 10.0, 15.0).is_err());
        assert!(BetaRisk::new(-1.0, 100.0, 10.0, 15.0).is_err());
    }

    #[test]
    fn beta_risk_distribution() {
        // rate 1/100 over three years: ~0.03 events per path
        let cat_risk = BetaRisk::new(100.0, 100.0, 10.0, 15.0).unwrap();
        let (start, end) = (date(2015, 1, 2), date(2018, 1, 2));

        let paths = 100_000;
        let mut sum = 0.0;
        let mut sum_squares = 0.0;
        let mut poisson_sum = 0.0;

        let mut sim = cat_risk.new_simulation(start, end).unwrap();
        let mut path = Vec::new();
        for _ in 0..paths {
            assert!(sim.next_path(&mut path));
            assert!(path.windows(2).all(|w| w[0].0 <= w[1].0));
            assert!(path.iter().all(|&(d, _)| d >= start && d <= end));
            let process_value: Real = path.iter().map(|(_, loss)| loss).sum();
            sum += process_value;
            sum_squares += process_value * process_value;
            poisson_sum += path.len() as Real;
        }

        let poisson_mean = poisson_sum / paths as Real;
        let actual_mean = sum / paths as Real;
        let actual_var = sum_squares / paths as Real - actual_mean * actual_mean;

        let expected_poisson_mean = 3.0 / 100.0;
        let expected_mean = 3.0 * 10.0 / 100.0;
        // compound Poisson: λt · E[X²]
        let expected_var = 3.0 * (15.0 * 15.0 + 10.0 * 10.0) / 100.0;

        assert!(
            (poisson_mean - expected_poisson_mean).abs() / expected_poisson_mean < 0.10,
            "Poisson mean: expected ~{expected_poisson_mean}, got {poisson_mean}"
        );
        assert!(
            (actual_mean - expected_mean).abs() / expected_mean < 0.10,
            "Mean: expected ~{expected_mean}, got {actual_mean}"
        );
        assert!(
            (actual_var - expected_var).abs() / expected_var < 0.20,
            "Variance: expected ~{expected_var}, got {actual_var}"
        );
    }

    #[test]
    fn beta_risk_streams_are_reproducible_and_distinct() {
        let risk = BetaRisk::new(100.0, 1.0, 10.0, 15.0).unwrap().with_seed(7);
        let (start, end) = (date(2020, 1, 1), date(2025, 1, 1));
        let draw = |mut sim: Box<dyn CatSimulation>| {
            let mut out = Vec::new();
            let mut path = Vec::new();
            for _ in 0..20 {
                sim.next_path(&mut path);
                out.push(path.clone());
            }
            out
        };

        let a = draw(risk.new_simulation(start, end).unwrap());
        let b = draw(risk.new_simulation(start, end).unwrap());
        assert_eq!(a, b);

        let s0 = draw(risk.new_sub_simulation(start, end, 0).unwrap());
        let s0_again = draw(risk.new_sub_simulation(start, end, 0).unwrap());
        let s1 = draw(risk.new_sub_simulation(start, end, 1).unwrap());
        assert_eq!(s0, s0_again);
        assert_ne!(s0, s1);
    }

    #[test]
    fn stream_seeds_differ() {
        let seeds: Vec<u64> = (0..64).map(|s| stream_seed(DEFAULT_SEED, s)).collect();
        let mut unique = seeds.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), seeds.len());
    }
}
