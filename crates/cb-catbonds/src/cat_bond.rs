//! The catastrophe bond instrument.
//!
//! A [`CatBond`] is a bond whose notional is impaired by catastrophe events
//! according to its [`NotionalRisk`] rule.  Pricing is delegated to a
//! [`PricingEngine`] over [`CatBondArguments`]; results are cached until the
//! engine's market data changes or a new engine is set.

use crate::instrument::{Instrument, PricingEngine};
use crate::notional_risk::NotionalRisk;
use cb_cashflows::{cashflows, Leg};
use cb_core::{
    errors::{Error, Result},
    LazyCache, Natural, Observable, ObservableImpl, Observer, Real, Size,
};
use cb_time::{Date, Settings};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, Weak};
use tracing::trace;

/// Terms of a cat bond as seen by a pricing engine.
#[derive(Debug, Clone)]
pub struct CatBondArguments {
    /// First date on which events can impair the notional.
    pub start_date: Date,
    /// Settlement date; engines fall back to the evaluation date.
    pub settlement_date: Option<Date>,
    /// Coupons and redemptions, in date order.
    pub cashflows: Leg,
    /// Mapping from catastrophe events to notional reductions.
    pub notional_risk: Arc<dyn NotionalRisk>,
}

/// Distribution figures of the simulated path NPVs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Value minus the lower percentile of the path NPVs.
    pub var: Real,
    /// Standard deviation of the path NPVs.
    pub std_dev: Real,
    /// Skewness of the path NPVs.
    pub skew: Real,
    /// Excess kurtosis of the path NPVs.
    pub kurtosis: Real,
}

/// Outcome of pricing a cat bond.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatBondResults {
    /// Expected value at the valuation date.
    pub value: Real,
    /// Expected value at the settlement date.
    pub settlement_value: Real,
    /// Date the values refer to; `None` for expired instruments.
    pub valuation_date: Option<Date>,
    /// Fraction of paths losing some notional.
    pub loss_probability: Real,
    /// Fraction of paths losing the whole notional.
    pub exhaustion_probability: Real,
    /// Mean fraction of notional lost.
    pub expected_loss: Real,
    /// Number of simulated paths.
    pub paths: Size,
    /// Present when the engine was asked for risk metrics.
    pub risk_metrics: Option<RiskMetrics>,
}

/// Pricing engines accepted by [`CatBond`].
pub type CatBondPricingEngine = dyn PricingEngine<CatBondArguments, Results = CatBondResults>;

/// A bond whose notional is exposed to catastrophe losses.
#[derive(Debug)]
pub struct CatBond {
    settlement_days: Natural,
    start_date: Date,
    settlement_date: Option<Date>,
    cashflows: Leg,
    notional_risk: Arc<dyn NotionalRisk>,
    engine: RwLock<Option<Arc<CatBondPricingEngine>>>,
    results: LazyCache<CatBondResults>,
    observers: ObservableImpl,
}

impl CatBond {
    /// Create a cat bond settling `settlement_days` weekdays after the
    /// evaluation date.
    ///
    /// Fails if the payment dates of `cashflows` decrease.
    pub fn new(
        settlement_days: Natural,
        start_date: Date,
        cashflows: Leg,
        notional_risk: Arc<dyn NotionalRisk>,
    ) -> Result<Self> {
        cashflows::check_ordering(&cashflows)?;
        Ok(Self {
            settlement_days,
            start_date,
            settlement_date: None,
            cashflows,
            notional_risk,
            engine: RwLock::new(None),
            results: LazyCache::new(),
            observers: ObservableImpl::new(),
        })
    }

    /// Settle on a fixed date instead of counting from the evaluation date.
    pub fn with_settlement_date(mut self, date: Date) -> Self {
        self.settlement_date = Some(date);
        self
    }

    /// Number of weekdays between evaluation and settlement.
    pub fn settlement_days(&self) -> Natural {
        self.settlement_days
    }

    /// First date on which events can impair the notional.
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// The bond's cash flows.
    pub fn cashflows(&self) -> &Leg {
        &self.cashflows
    }

    /// The notional impairment rule.
    pub fn notional_risk(&self) -> &Arc<dyn NotionalRisk> {
        &self.notional_risk
    }

    /// Settlement date for the current evaluation date.
    pub fn settlement_date(&self) -> Result<Date> {
        match self.settlement_date {
            Some(date) => Ok(date),
            None => Settings::instance()
                .evaluation_date()
                .add_weekdays(self.settlement_days),
        }
    }

    /// Install `engine` and drop any cached results.
    ///
    /// The bond observes the engine's market data from then on and stops
    /// observing the previous engine's.
    pub fn set_pricing_engine(self: &Arc<Self>, engine: Arc<CatBondPricingEngine>) {
        let observer: Weak<dyn Observer> = Arc::downgrade(self) as Weak<CatBond>;
        {
            let mut slot = self.engine.write().expect("pricing engine lock poisoned");
            if let Some(previous) = slot.take() {
                for observable in previous.observables() {
                    observable.unregister_observer(&observer);
                }
            }
            for observable in engine.observables() {
                observable.register_observer(observer.clone());
            }
            *slot = Some(engine);
        }
        self.update();
    }

    /// The arguments handed to the engine.
    pub fn arguments(&self) -> Result<CatBondArguments> {
        Ok(CatBondArguments {
            start_date: self.start_date,
            settlement_date: Some(self.settlement_date()?),
            cashflows: self.cashflows.clone(),
            notional_risk: Arc::clone(&self.notional_risk),
        })
    }

    /// All results of the last valuation, computing them if stale.
    pub fn results(&self) -> Result<CatBondResults> {
        self.results.get_or_try_calculate(|| self.perform_calculations())
    }

    fn perform_calculations(&self) -> Result<CatBondResults> {
        if self.is_expired() {
            trace!("cat bond expired");
            return Ok(CatBondResults::default());
        }
        let engine = self
            .engine
            .read()
            .expect("pricing engine lock poisoned")
            .clone()
            .ok_or_else(|| Error::Runtime("null pricing engine".into()))?;
        engine.calculate(&self.arguments()?)
    }

    /// Discard cached results and price again.
    pub fn recalculate(&self) -> Result<CatBondResults> {
        self.results.invalidate();
        self.results()
    }

    /// Keep serving the current results regardless of notifications.
    pub fn freeze(&self) {
        self.results.freeze();
    }

    /// Undo [`freeze`](Self::freeze) and drop the results kept meanwhile.
    pub fn unfreeze(&self) {
        self.results.unfreeze();
        self.update();
    }

    /// Expected value at the valuation date.
    pub fn npv(&self) -> Result<Real> {
        Ok(self.results()?.value)
    }

    /// Expected value at the settlement date.
    pub fn settlement_value(&self) -> Result<Real> {
        Ok(self.results()?.settlement_value)
    }

    /// Date the values refer to.
    pub fn valuation_date(&self) -> Result<Date> {
        self.results()?
            .valuation_date
            .ok_or_else(|| Error::Runtime("valuation date not provided".into()))
    }

    /// Probability of losing some notional.
    pub fn loss_probability(&self) -> Result<Real> {
        Ok(self.results()?.loss_probability)
    }

    /// Expected fraction of notional lost.
    pub fn expected_loss(&self) -> Result<Real> {
        Ok(self.results()?.expected_loss)
    }

    /// Probability of losing the whole notional.
    pub fn exhaustion_probability(&self) -> Result<Real> {
        Ok(self.results()?.exhaustion_probability)
    }

    /// Value at risk; `None` unless the engine computes risk metrics.
    pub fn var(&self) -> Result<Option<Real>> {
        Ok(self.results()?.risk_metrics.map(|m| m.var))
    }

    /// Standard deviation of the path values, if computed.
    pub fn std_dev(&self) -> Result<Option<Real>> {
        Ok(self.results()?.risk_metrics.map(|m| m.std_dev))
    }

    /// Skewness of the path values, if computed.
    pub fn skew(&self) -> Result<Option<Real>> {
        Ok(self.results()?.risk_metrics.map(|m| m.skew))
    }

    /// Excess kurtosis of the path values, if computed.
    pub fn kurtosis(&self) -> Result<Option<Real>> {
        Ok(self.results()?.risk_metrics.map(|m| m.kurtosis))
    }
}

impl Instrument for CatBond {
    fn is_expired(&self) -> bool {
        cashflows::is_expired(
            &self.cashflows,
            Some(true),
            Settings::instance().evaluation_date(),
        )
    }

    fn maturity_date(&self) -> Option<Date> {
        cashflows::maturity_date(&self.cashflows)
    }
}

impl Observer for CatBond {
    fn update(&self) {
        if self.results.invalidate() {
            trace!("cat bond results invalidated");
        }
        self.observers.notify();
    }
}

impl Observable for CatBond {
    fn register_observer(&self, observer: Weak<dyn Observer>) {
        self.observers.register(observer);
    }

    fn unregister_observer(&self, observer: &Weak<dyn Observer>) {
        self.observers.unregister(observer);
    }

    fn notify_observers(&self) {
        self.observers.notify();
    }
}
