//! Monte Carlo pricing engine for catastrophe bonds.
//!
//! Each simulated path of catastrophe events is mapped onto the bond's
//! surviving notional by the bond's [`NotionalRisk`] rule and valued with a
//! [`RiskAdjustedPathPricer`].  Paths without loss reuse the risk-free NPV,
//! computed once per run.  Path outcomes are folded into a
//! [`PathAccumulator`] and normalised by the number of paths actually
//! simulated.

use crate::accumulator::{PathAccumulator, PathOutcome};
use crate::cat_bond::{CatBondArguments, CatBondResults, RiskMetrics};
use crate::cat_risk::{CatEvent, CatRisk};
use crate::config::{CatBondEngineConfig, Parallelism};
use crate::instrument::PricingEngine;
use crate::notional_risk::{NotionalPath, NotionalRisk};
use crate::path_pricer::RiskAdjustedPathPricer;
use cb_cashflows::cashflows;
use cb_core::{
    ensure,
    errors::{Error, Result},
    Handle, Observable, Real, Size,
};
use cb_math::{GeneralStatistics, SampleStatistics};
use cb_termstructures::YieldTermStructure;
use cb_time::{Date, Settings};
use rayon::prelude::*;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, debug_span, trace};

/// Monte Carlo engine valuing a [`CatBond`](crate::CatBond) under a
/// catastrophe risk model.
///
/// `S` is the accumulator collecting the path NPV sample.
#[derive(Debug)]
pub struct MonteCarloCatBondEngine<S = GeneralStatistics> {
    cat_risk: Arc<dyn CatRisk>,
    discount_curve: Handle<dyn YieldTermStructure>,
    config: CatBondEngineConfig,
    _statistics: PhantomData<fn() -> S>,
}

impl MonteCarloCatBondEngine {
    /// Engine with the default configuration: sequential, capped at
    /// [`MAX_PATHS`](crate::MAX_PATHS) paths, no risk metrics.
    pub fn new(cat_risk: Arc<dyn CatRisk>, discount_curve: Handle<dyn YieldTermStructure>) -> Self {
        Self::with_config(cat_risk, discount_curve, CatBondEngineConfig::default())
    }

    /// Engine with an explicit configuration.
    pub fn with_config(
        cat_risk: Arc<dyn CatRisk>,
        discount_curve: Handle<dyn YieldTermStructure>,
        config: CatBondEngineConfig,
    ) -> Self {
        Self::with_statistics(cat_risk, discount_curve, config)
    }
}

impl<S: SampleStatistics> MonteCarloCatBondEngine<S> {
    /// Engine collecting the path sample in a custom accumulator.
    pub fn with_statistics(
        cat_risk: Arc<dyn CatRisk>,
        discount_curve: Handle<dyn YieldTermStructure>,
        config: CatBondEngineConfig,
    ) -> Self {
        Self {
            cat_risk,
            discount_curve,
            config,
            _statistics: PhantomData,
        }
    }

    /// The catastrophe risk model.
    pub fn cat_risk(&self) -> &Arc<dyn CatRisk> {
        &self.cat_risk
    }

    /// The discounting curve handle.
    pub fn discount_curve(&self) -> &Handle<dyn YieldTermStructure> {
        &self.discount_curve
    }

    /// The engine configuration.
    pub fn config(&self) -> &CatBondEngineConfig {
        &self.config
    }

    /// Simulate the bond seen from `settlement_date` and express the value
    /// at `npv_date`.
    ///
    /// The returned record carries no valuation date; `settlement_value`
    /// equals `value`.
    pub fn npv(
        &self,
        curve: &dyn YieldTermStructure,
        args: &CatBondArguments,
        include_settlement_date_flows: bool,
        settlement_date: Date,
        npv_date: Date,
    ) -> Result<CatBondResults> {
        let Some(maturity) = cashflows::maturity_date(&args.cashflows) else {
            debug!("no cash flows, nothing to simulate");
            return Ok(CatBondResults::default());
        };
        let effective = args.start_date.max(settlement_date);
        if effective > maturity {
            debug!(%effective, %maturity, "every cash flow precedes the simulation window");
            return Ok(CatBondResults::default());
        }

        let pricer = RiskAdjustedPathPricer::new(
            &args.cashflows,
            curve,
            include_settlement_date_flows,
            settlement_date,
        );
        let risk_free_npv = pricer.risk_free_npv();
        let valuer = PathValuer {
            notional_risk: &*args.notional_risk,
            pricer: &pricer,
            effective,
            maturity,
        };

        let acc = match self.config.parallelism() {
            Parallelism::Sequential => self.run_sequential(&valuer, risk_free_npv)?,
            Parallelism::Batched { batch_size } => {
                self.run_batched(&valuer, risk_free_npv, batch_size)?
            }
            Parallelism::SubStreams { block_paths } => {
                self.run_sub_streams(&valuer, risk_free_npv, block_paths)?
            }
        };
        debug!(
            %effective,
            %maturity,
            paths = acc.paths(),
            loss_paths = acc.loss_paths(),
            exhausted_paths = acc.exhausted_paths(),
            "simulation finished"
        );

        if acc.paths() == 0 {
            return Err(Error::Simulation(format!(
                "no simulated paths available between {effective} and {maturity}"
            )));
        }
        let n = acc.paths() as Real;
        let df = curve.discount(npv_date);
        ensure!(df > 0.0, "non-positive discount factor ({df}) at {npv_date}");
        let value = acc.total_npv() / (n * df);

        let risk_metrics = self
            .config
            .var_level()
            .map(|level| risk_metrics(acc.statistics(), value, level))
            .transpose()?;

        Ok(CatBondResults {
            value,
            settlement_value: value,
            valuation_date: None,
            loss_probability: acc.loss_paths() as Real / n,
            exhaustion_probability: acc.exhausted_paths() as Real / n,
            expected_loss: acc.expected_loss_sum() / n,
            paths: acc.paths(),
            risk_metrics,
        })
    }

    fn run_sequential(
        &self,
        valuer: &PathValuer<'_>,
        risk_free_npv: Real,
    ) -> Result<PathAccumulator<S>> {
        let max_paths = self.config.max_paths();
        let mut simulation = self.cat_risk.new_simulation(valuer.effective, valuer.maturity)?;
        let mut acc = PathAccumulator::new();
        let mut events = Vec::new();
        let mut path = valuer.new_path();
        while acc.paths() < max_paths && simulation.next_path(&mut events) {
            acc.add(valuer.value(&events, &mut path)?, risk_free_npv)?;
        }
        self.note_truncation(acc.paths());
        Ok(acc)
    }

    fn run_batched(
        &self,
        valuer: &PathValuer<'_>,
        risk_free_npv: Real,
        batch_size: Size,
    ) -> Result<PathAccumulator<S>> {
        let max_paths = self.config.max_paths();
        let mut simulation = self.cat_risk.new_simulation(valuer.effective, valuer.maturity)?;
        let mut acc = PathAccumulator::new();
        let mut batch: Vec<Vec<CatEvent>> = Vec::with_capacity(batch_size.min(max_paths));
        let mut exhausted = false;

        while !exhausted && acc.paths() < max_paths {
            let wanted = batch_size.min(max_paths - acc.paths());
            batch.clear();
            while batch.len() < wanted {
                let mut events = Vec::new();
                if !simulation.next_path(&mut events) {
                    exhausted = true;
                    break;
                }
                batch.push(events);
            }

            let outcomes: Vec<Result<PathOutcome>> = batch
                .par_iter()
                .map_init(|| valuer.new_path(), |path, events| valuer.value(events, path))
                .collect();
            for outcome in outcomes {
                acc.add(outcome?, risk_free_npv)?;
            }
        }
        self.note_truncation(acc.paths());
        Ok(acc)
    }

    fn run_sub_streams(
        &self,
        valuer: &PathValuer<'_>,
        risk_free_npv: Real,
        block_paths: Size,
    ) -> Result<PathAccumulator<S>> {
        let max_paths = self.config.max_paths();
        let blocks = max_paths.div_ceil(block_paths);

        let partials: Vec<Result<PathAccumulator<S>>> = (0..blocks)
            .into_par_iter()
            .map(|block| -> Result<PathAccumulator<S>> {
                let quota = block_paths.min(max_paths - block * block_paths);
                let mut simulation = self.cat_risk.new_sub_simulation(
                    valuer.effective,
                    valuer.maturity,
                    block as u64,
                )?;
                let mut acc = PathAccumulator::new();
                let mut events = Vec::new();
                let mut path = valuer.new_path();
                while acc.paths() < quota && simulation.next_path(&mut events) {
                    acc.add(valuer.value(&events, &mut path)?, risk_free_npv)?;
                }
                Ok(acc)
            })
            .collect();

        let mut acc = PathAccumulator::new();
        for partial in partials {
            acc.merge(partial?);
        }
        self.note_truncation(acc.paths());
        Ok(acc)
    }

    fn note_truncation(&self, paths: Size) {
        if paths >= self.config.max_paths() {
            debug!(max_paths = self.config.max_paths(), "path cap reached");
        }
    }
}

fn risk_metrics<S: SampleStatistics>(stats: &S, value: Real, level: Real) -> Result<RiskMetrics> {
    Ok(RiskMetrics {
        var: value - stats.percentile(1.0 - level)?,
        std_dev: stats.standard_deviation()?,
        skew: stats.skewness()?,
        kurtosis: stats.kurtosis()?,
    })
}

impl<S: SampleStatistics> PricingEngine<CatBondArguments> for MonteCarloCatBondEngine<S> {
    type Results = CatBondResults;

    fn calculate(&self, args: &CatBondArguments) -> Result<CatBondResults> {
        let curve = self
            .discount_curve
            .current()
            .ok_or_else(|| Error::EmptyHandle("discounting term structure".into()))?;

        let valuation_date = curve.reference_date();
        let settlement_date = args
            .settlement_date
            .unwrap_or_else(|| Settings::instance().evaluation_date());
        let include = self
            .config
            .include_settlement_date_flows()
            .unwrap_or_else(|| Settings::instance().include_reference_date_events());
        let _span = debug_span!("cat_bond_valuation", %valuation_date, %settlement_date).entered();

        let mut results = self.npv(&*curve, args, include, valuation_date, valuation_date)?;
        if include || settlement_date != valuation_date {
            results.settlement_value = self
                .npv(&*curve, args, include, settlement_date, settlement_date)?
                .settlement_value;
        }
        results.valuation_date = Some(valuation_date);
        Ok(results)
    }

    fn observables(&self) -> Vec<&dyn Observable> {
        let curve: &dyn Observable = &self.discount_curve;
        vec![curve]
    }
}

/// Values single event paths against fixed, shared inputs.
struct PathValuer<'a> {
    notional_risk: &'a dyn NotionalRisk,
    pricer: &'a RiskAdjustedPathPricer,
    effective: Date,
    maturity: Date,
}

impl PathValuer<'_> {
    /// Reductions taking effect after maturity never touch a cash flow.
    fn new_path(&self) -> NotionalPath {
        NotionalPath::with_horizon(self.maturity)
    }

    fn value(&self, events: &[CatEvent], path: &mut NotionalPath) -> Result<PathOutcome> {
        self.check_events(events)?;
        self.notional_risk.update_path(events, path)?;
        let loss = path.loss();
        if loss > 0.0 {
            let npv = self.pricer.path_npv(path);
            trace!(loss, npv, events = events.len(), "impaired path");
            Ok(PathOutcome::Impaired { npv, loss })
        } else {
            Ok(PathOutcome::RiskFree)
        }
    }

    fn check_events(&self, events: &[CatEvent]) -> Result<()> {
        let mut previous = self.effective;
        for &(date, loss) in events {
            if date < self.effective || date > self.maturity {
                return Err(Error::Simulation(format!(
                    "event on {date} outside the simulated period [{}, {}]",
                    self.effective, self.maturity
                )));
            }
            if date < previous {
                return Err(Error::Simulation(format!(
                    "event on {date} follows an event on {previous}"
                )));
            }
            if !(loss.is_finite() && loss >= 0.0) {
                return Err(Error::Simulation(format!(
                    "event on {date} has invalid loss {loss}"
                )));
            }
            previous = date;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cat_risk::BetaRisk;
    use crate::notional_risk::{DigitalNotionalRisk, EventPaymentOffset};
    use cb_cashflows::{Leg, Redemption};
    use cb_termstructures::FlatForward;
    use cb_time::{ActualActualIsda, SavedSettings};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn args(start: Date, maturity: Date) -> CatBondArguments {
        let cashflows: Leg = vec![Arc::new(Redemption::new(100.0, maturity))];
        CatBondArguments {
            start_date: start,
            settlement_date: Some(start),
            cashflows,
            notional_risk: Arc::new(DigitalNotionalRisk::new(EventPaymentOffset::NoOffset, 50.0)),
        }
    }

    #[test]
    fn path_checks() {
        let (start, end) = (date(2024, 1, 1), date(2025, 1, 1));
        let curve = FlatForward::continuous(start, 0.0, ActualActualIsda);
        let pricer = RiskAdjustedPathPricer::new(&Vec::new(), &curve, false, start);
        let rule = DigitalNotionalRisk::new(EventPaymentOffset::NoOffset, 1.0);
        let valuer = PathValuer {
            notional_risk: &rule,
            pricer: &pricer,
            effective: start,
            maturity: end,
        };
        assert!(valuer.check_events(&[(date(2024, 2, 1), 0.5), (date(2024, 3, 1), 0.0)]).is_ok());
        for bad in [
            vec![(date(2023, 12, 31), 0.5)],
            vec![(date(2025, 1, 2), 0.5)],
            vec![(date(2024, 3, 1), 0.5), (date(2024, 2, 1), 0.5)],
            vec![(date(2024, 3, 1), -0.5)],
            vec![(date(2024, 3, 1), Real::NAN)],
        ] {
            assert!(matches!(valuer.check_events(&bad), Err(Error::Simulation(_))));
        }
    }

    #[test]
    fn thread_layout_does_not_change_sub_stream_results() {
        let _saved = SavedSettings::new();
        let (start, maturity) = (date(2024, 1, 1), date(2027, 1, 1));
        let curve: Arc<dyn YieldTermStructure> =
            Arc::new(FlatForward::continuous(start, 0.03, ActualActualIsda));
        let risk: Arc<dyn CatRisk> = Arc::new(BetaRisk::new(100.0, 2.0, 30.0, 20.0).unwrap());
        let config = CatBondEngineConfig::builder()
            .max_paths(2_000)
            .parallelism(Parallelism::SubStreams { block_paths: 300 })
            .build()
            .unwrap();
        let engine = MonteCarloCatBondEngine::with_config(risk, Handle::new(curve), config);
        let args = args(start, maturity);

        let pool = |threads| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
        };
        let one = pool(1).install(|| engine.calculate(&args)).unwrap();
        let four = pool(4).install(|| engine.calculate(&args)).unwrap();
        assert_eq!(one, four);
        assert_eq!(one.paths, 2_000);
    }
}
