//! Pricing a cat bond against a historical event catalogue.

use approx::assert_relative_eq;
use catbond::prelude::*;
use catbond::time::SavedSettings;
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn catalogue() -> EventSet {
    let events = vec![
        (date(2003, 5, 10), 120.0),
        (date(2010, 8, 1), 60.0),
        (date(2015, 3, 1), 40.0),
        (date(2015, 9, 1), 40.0),
    ];
    EventSet::new(events, date(2000, 1, 1), date(2019, 12, 31)).unwrap()
}

#[test]
fn historical_years_replay_onto_the_bond() {
    let _saved = SavedSettings::new();
    let today = date(2025, 1, 1);
    let maturity = date(2026, 1, 1);
    Settings::instance().set_evaluation_date(today);

    let cashflows: Leg = vec![Arc::new(Redemption::new(100.0, maturity))];
    let rule = ProportionalNotionalRisk::new(EventPaymentOffset::NoOffset, 50.0, 150.0).unwrap();
    let bond = Arc::new(CatBond::new(0, today, cashflows, Arc::new(rule)).unwrap());

    let curve: Arc<dyn YieldTermStructure> =
        Arc::new(FlatForward::from_discount(today, 0.95, maturity, Actual365Fixed).unwrap());
    let config = CatBondEngineConfig::builder()
        .include_settlement_date_flows(false)
        .build()
        .unwrap();
    let engine = MonteCarloCatBondEngine::with_config(Arc::new(catalogue()), Handle::new(curve), config);
    bond.set_pricing_engine(Arc::new(engine));

    // one path per catalogue year from 2000 to 2018
    let results = bond.results().unwrap();
    assert_eq!(results.paths, 19);

    // 2003 keeps 30% of the notional, 2010 keeps 90%, 2015 keeps 70%
    let surviving = 16.0 + 0.3 + 0.9 + 0.7;
    assert_relative_eq!(results.value, 95.0 * surviving / 19.0, epsilon = 1e-9);
    assert_relative_eq!(results.loss_probability, 3.0 / 19.0, epsilon = 1e-12);
    assert_eq!(results.exhaustion_probability, 0.0);
    assert_relative_eq!(results.expected_loss, (0.7 + 0.1 + 0.3) / 19.0, epsilon = 1e-12);
    assert_eq!(bond.valuation_date().unwrap(), today);
}

#[test]
fn matured_bond_is_worth_nothing() {
    let _saved = SavedSettings::new();
    Settings::instance().set_evaluation_date(date(2027, 6, 1));

    let maturity = date(2026, 1, 1);
    let cashflows: Leg = vec![Arc::new(Redemption::new(100.0, maturity))];
    let rule = DigitalNotionalRisk::new(EventPaymentOffset::DaysOffset(5), 100.0);
    let bond = CatBond::new(2, date(2025, 1, 1), cashflows, Arc::new(rule)).unwrap();

    assert!(bond.is_expired());
    assert_eq!(bond.npv().unwrap(), 0.0);
    assert_eq!(bond.loss_probability().unwrap(), 0.0);
}
