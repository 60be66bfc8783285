use std::collections::{BTreeMap, BTreeSet};

/// Number of trailing months the report covers.
pub const MONTHS_TRACKED: usize = 5;

/// Fixed-length series of one account's monthly costs, oldest first.
/// Never reordered after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostSeries([f64; MONTHS_TRACKED]);

impl CostSeries {
    pub fn new(values: [f64; MONTHS_TRACKED]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; MONTHS_TRACKED] {
        &self.0
    }

    /// Five months ago (m5).
    pub fn oldest(&self) -> f64 {
        self.0[0]
    }

    /// Four months ago (m4).
    pub fn four_months_ago(&self) -> f64 {
        self.0[1]
    }

    /// Two months ago (m2).
    pub fn two_months_ago(&self) -> f64 {
        self.0[MONTHS_TRACKED - 2]
    }

    /// Last month (m1).
    pub fn last_month(&self) -> f64 {
        self.0[MONTHS_TRACKED - 1]
    }

    /// Number of months with exactly zero cost.
    pub fn zero_months(&self) -> usize {
        self.0.iter().filter(|cost| **cost == 0.0).count()
    }
}

/// Assembles one series per account from per-window fetch results, oldest
/// window first. Covers the union of accounts seen in any window; an account
/// absent from a window gets 0.0 for that slot.
pub fn assemble_series(window_costs: &[BTreeMap<String, f64>]) -> BTreeMap<String, CostSeries> {
    assert_eq!(
        window_costs.len(),
        MONTHS_TRACKED,
        "one result set per tracked month"
    );

    let accounts: BTreeSet<&String> = window_costs.iter().flat_map(|costs| costs.keys()).collect();

    accounts
        .into_iter()
        .map(|account| {
            let mut values = [0.0; MONTHS_TRACKED];
            for (slot, costs) in window_costs.iter().enumerate() {
                values[slot] = costs.get(account).copied().unwrap_or(0.0);
            }
            (account.clone(), CostSeries::new(values))
        })
        .collect()
}
