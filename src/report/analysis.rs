//! Trend detection over per-account cost series: month-over-month deltas,
//! significant-increase flags, and the least-squares long-term trend.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::Thresholds;

use super::series::{CostSeries, MONTHS_TRACKED};

/// One ranked table row derived from a single account's series.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDelta {
    pub account_id: String,
    pub series: CostSeries,
    /// Last month minus the month before.
    pub change: f64,
    /// `change` relative to the prior month, 0 when the prior month is zero.
    pub pct: f64,
}

/// Emitted for accounts whose prior-month spend exceeds the significance
/// floor, regardless of the sign of the change.
#[derive(Debug, Clone, PartialEq)]
pub struct IncreaseSignal {
    pub account_id: String,
    pub amount: f64,
    pub pct: f64,
}

/// Emitted for accounts on a sustained upward trajectory over the full series.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSignal {
    pub account_id: String,
    /// Last month minus four months ago.
    pub amount: f64,
    pub slope: f64,
}

/// Column-wise sums over the ranked rows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub months: [f64; MONTHS_TRACKED],
    pub change: f64,
    pub pct: f64,
}

/// Top service cost delta for one account between the two latest months.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceIncrease {
    pub service: String,
    pub amount: f64,
}

/// Per-account service breakdown, parallel to `Analysis::increases`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceBreakdown {
    pub account_id: String,
    pub services: Vec<ServiceIncrease>,
}

/// Everything the renderer needs, computed in one pass over the series map.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Rows sorted by `change` descending; ties keep the input order.
    pub ranked: Vec<AccountDelta>,
    pub totals: Totals,
    /// Sorted by `amount` descending.
    pub increases: Vec<IncreaseSignal>,
    /// Sorted by `amount` descending.
    pub trends: Vec<TrendSignal>,
}

/// Percentage change with the zero-denominator policy: 0, never NaN or Inf.
pub fn pct_change(current: f64, prior: f64) -> f64 {
    if prior != 0.0 {
        (current - prior) / prior * 100.0
    } else {
        0.0
    }
}

/// Least-squares slope of the best-fit line over equally spaced points
/// `(0, values[0]), (1, values[1]), ...`.
pub fn series_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (x, y) in values.iter().enumerate() {
        let x = x as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }
    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Ranks accounts by most recent change and derives the increase and trend
/// signals. Iteration over the map fixes the tie-break order for equal deltas.
pub fn analyze(
    series_by_account: &BTreeMap<String, CostSeries>,
    thresholds: &Thresholds,
) -> Analysis {
    let mut ranked: Vec<AccountDelta> = series_by_account
        .iter()
        .map(|(account_id, series)| {
            let change = series.last_month() - series.two_months_ago();
            AccountDelta {
                account_id: account_id.clone(),
                series: *series,
                change,
                pct: pct_change(series.last_month(), series.two_months_ago()),
            }
        })
        .collect();
    ranked.sort_by(|a, b| descending(a.change, b.change));

    // Fold over the ranked rows so the footer is their column-wise sum.
    let mut totals = Totals::default();
    for row in &ranked {
        for (slot, cost) in row.series.values().iter().enumerate() {
            totals.months[slot] += cost;
        }
        totals.change += row.change;
    }
    totals.pct = pct_change(
        totals.months[MONTHS_TRACKED - 1],
        totals.months[MONTHS_TRACKED - 2],
    );

    let mut increases = Vec::new();
    let mut trends = Vec::new();
    for row in &ranked {
        if row.series.two_months_ago() > thresholds.significance_floor {
            increases.push(IncreaseSignal {
                account_id: row.account_id.clone(),
                amount: row.change,
                pct: row.pct,
            });
        }

        // More than half the months at zero means too sparse a history to
        // call a trend.
        if row.series.zero_months() > MONTHS_TRACKED / 2 {
            continue;
        }
        let slope = series_slope(row.series.values());
        let long_term_amount = row.series.last_month() - row.series.four_months_ago();
        if slope > 0.0 && long_term_amount > thresholds.trend_increase_floor {
            trends.push(TrendSignal {
                account_id: row.account_id.clone(),
                amount: long_term_amount,
                slope,
            });
        }
    }
    increases.sort_by(|a, b| descending(a.amount, b.amount));
    trends.sort_by(|a, b| descending(a.amount, b.amount));

    tracing::debug!(
        accounts = ranked.len(),
        increases = increases.len(),
        trends = trends.len(),
        "trend analysis complete"
    );

    Analysis {
        ranked,
        totals,
        increases,
        trends,
    }
}

/// Top `limit` per-service deltas between the two latest months, considering
/// only services present in the most recent month.
pub fn top_service_increases(
    current: &BTreeMap<String, f64>,
    prior: &BTreeMap<String, f64>,
    limit: usize,
) -> Vec<ServiceIncrease> {
    let mut deltas: Vec<ServiceIncrease> = current
        .iter()
        .map(|(service, amount)| ServiceIncrease {
            service: service.clone(),
            amount: amount - prior.get(service).copied().unwrap_or(0.0),
        })
        .collect();
    deltas.sort_by(|a, b| descending(a.amount, b.amount));
    deltas.truncate(limit);
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_map(entries: &[(&str, [f64; MONTHS_TRACKED])]) -> BTreeMap<String, CostSeries> {
        entries
            .iter()
            .map(|(id, values)| (id.to_string(), CostSeries::new(*values)))
            .collect()
    }

    #[test]
    fn pct_change_is_zero_for_zero_prior() {
        assert_eq!(pct_change(500.0, 0.0), 0.0);
        assert!((pct_change(110.0, 100.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn slope_of_linear_series_is_exact() {
        assert!((series_slope(&[1100.0, 1200.0, 1300.0, 1400.0, 1500.0]) - 100.0).abs() < 1e-9);
        assert_eq!(series_slope(&[7.0, 7.0, 7.0, 7.0, 7.0]), 0.0);
        assert_eq!(series_slope(&[42.0]), 0.0);
    }

    #[test]
    fn ranking_is_descending_on_change() {
        let map = series_map(&[
            ("low", [0.0, 0.0, 0.0, 100.0, 110.0]),
            ("high", [0.0, 0.0, 0.0, 100.0, 400.0]),
            ("drop", [0.0, 0.0, 0.0, 100.0, 50.0]),
        ]);
        let analysis = analyze(&map, &Thresholds::default());
        let order: Vec<&str> = analysis
            .ranked
            .iter()
            .map(|row| row.account_id.as_str())
            .collect();
        assert_eq!(order, vec!["high", "low", "drop"]);
    }

    #[test]
    fn increase_flag_ignores_the_sign_of_the_change() {
        let map = series_map(&[("a", [0.0, 0.0, 0.0, 2000.0, 1000.0])]);
        let analysis = analyze(&map, &Thresholds::default());
        assert_eq!(analysis.increases.len(), 1);
        assert_eq!(analysis.increases[0].amount, -1000.0);
        assert!((analysis.increases[0].pct + 50.0).abs() < 1e-9);
    }

    #[test]
    fn sparse_series_never_trends() {
        let map = series_map(&[("a", [0.0, 0.0, 0.0, 0.0, 500.0])]);
        let analysis = analyze(&map, &Thresholds::default());
        assert!(analysis.trends.is_empty());
    }

    #[test]
    fn totals_are_column_sums_of_the_rows() {
        let map = series_map(&[
            ("a", [1.0, 2.0, 3.0, 4.0, 5.0]),
            ("b", [10.0, 20.0, 30.0, 40.0, 50.0]),
        ]);
        let analysis = analyze(&map, &Thresholds::default());
        assert_eq!(analysis.totals.months, [11.0, 22.0, 33.0, 44.0, 55.0]);
        assert_eq!(analysis.totals.change, 11.0);
        assert!((analysis.totals.pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn top_service_increases_keeps_positive_movers_over_present_negatives() {
        let current: BTreeMap<String, f64> = [("A", 100.0), ("B", 80.0), ("C", 20.0)]
            .into_iter()
            .map(|(service, amount)| (service.to_string(), amount))
            .collect();
        let prior: BTreeMap<String, f64> = [("A", 60.0), ("B", 90.0), ("C", 0.0)]
            .into_iter()
            .map(|(service, amount)| (service.to_string(), amount))
            .collect();

        let top = top_service_increases(&current, &prior, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].service, "A");
        assert!((top[0].amount - 40.0).abs() < 1e-9);
        assert_eq!(top[1].service, "C");
        assert!((top[1].amount - 20.0).abs() < 1e-9);
    }

    #[test]
    fn vanished_services_are_not_reported() {
        let current: BTreeMap<String, f64> =
            [("A".to_string(), 10.0)].into_iter().collect();
        let prior: BTreeMap<String, f64> = [("A".to_string(), 5.0), ("Gone".to_string(), 900.0)]
            .into_iter()
            .collect();

        let top = top_service_increases(&current, &prior, 2);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].service, "A");
    }
}
