use std::collections::BTreeMap;

use cost_summary::config::Thresholds;
use cost_summary::report::{analyze, CostSeries, MONTHS_TRACKED};

fn one_account(values: [f64; MONTHS_TRACKED]) -> BTreeMap<String, CostSeries> {
    let mut map = BTreeMap::new();
    map.insert("111111111111".to_string(), CostSeries::new(values));
    map
}

#[test]
fn gentle_growth_below_both_floors_raises_no_signals() {
    let analysis = analyze(&one_account([400.0, 410.0, 430.0, 450.0, 500.0]), &Thresholds::default());

    let row = &analysis.ranked[0];
    assert!((row.change - 50.0).abs() < 1e-9);
    assert!((row.pct - 11.111_111_111_111_11).abs() < 1e-6);

    // Slope is positive but the four-month increase is only 90.
    assert!(analysis.trends.is_empty());
    // Prior-month spend of 450 sits below the significance floor.
    assert!(analysis.increases.is_empty());
}

#[test]
fn steady_climb_trends_without_an_increase_flag() {
    let analysis = analyze(
        &one_account([1100.0, 1200.0, 1300.0, 1400.0, 1500.0]),
        &Thresholds::default(),
    );

    let row = &analysis.ranked[0];
    assert!((row.change - 100.0).abs() < 1e-9);
    assert!((row.pct - 7.142_857_142_857_143).abs() < 1e-6);

    // 1400 is not above the 1500 floor.
    assert!(analysis.increases.is_empty());

    assert_eq!(analysis.trends.len(), 1);
    let trend = &analysis.trends[0];
    assert!((trend.amount - 300.0).abs() < 1e-9);
    assert!((trend.slope - 100.0).abs() < 1e-9);
}

#[test]
fn zero_prior_month_yields_zero_percent_exactly() {
    let analysis = analyze(&one_account([10.0, 10.0, 10.0, 0.0, 500.0]), &Thresholds::default());
    let row = &analysis.ranked[0];
    assert_eq!(row.pct, 0.0);
    assert!(row.pct.is_finite());
    assert_eq!(analysis.totals.pct, 0.0);
}

#[test]
fn high_prior_spend_is_flagged_even_on_a_decrease() {
    let analysis = analyze(&one_account([0.0, 0.0, 0.0, 2000.0, 1000.0]), &Thresholds::default());
    assert_eq!(analysis.increases.len(), 1);
    assert!((analysis.increases[0].amount + 1000.0).abs() < 1e-9);
}

#[test]
fn mostly_zero_history_suppresses_the_trend() {
    let analysis = analyze(&one_account([0.0, 0.0, 0.0, 0.0, 500.0]), &Thresholds::default());
    assert!(analysis.trends.is_empty());
}

#[test]
fn equal_changes_keep_their_input_order() {
    let mut map = BTreeMap::new();
    map.insert("aaa".to_string(), CostSeries::new([0.0, 0.0, 0.0, 10.0, 60.0]));
    map.insert("bbb".to_string(), CostSeries::new([0.0, 0.0, 0.0, 20.0, 70.0]));
    map.insert("ccc".to_string(), CostSeries::new([0.0, 0.0, 0.0, 30.0, 20.0]));

    let analysis = analyze(&map, &Thresholds::default());
    let order: Vec<&str> = analysis
        .ranked
        .iter()
        .map(|row| row.account_id.as_str())
        .collect();
    assert_eq!(order, vec!["aaa", "bbb", "ccc"]);
}

#[test]
fn custom_thresholds_shift_both_gates() {
    let thresholds = Thresholds {
        significance_floor: 400.0,
        trend_increase_floor: 40.0,
    };
    let analysis = analyze(&one_account([400.0, 410.0, 430.0, 450.0, 500.0]), &thresholds);
    assert_eq!(analysis.increases.len(), 1);
    assert_eq!(analysis.trends.len(), 1);
}
