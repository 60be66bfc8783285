//! Billing API boundary: the query/response shapes and the client seam.

pub mod aws_cli;

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::calendar::MonthWindow;
use crate::errors::CostError;

pub use aws_cli::AwsCliClient;

/// Metric requested from the billing API.
pub const NET_AMORTIZED_COST: &str = "NetAmortizedCost";

/// Dimension the returned costs are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupDimension {
    LinkedAccount,
    Service,
}

impl GroupDimension {
    pub fn key(&self) -> &'static str {
        match self {
            GroupDimension::LinkedAccount => "LINKED_ACCOUNT",
            GroupDimension::Service => "SERVICE",
        }
    }
}

/// One billing query: which accounts, which month, grouped how.
#[derive(Debug, Clone)]
pub struct CostQuery {
    pub account_ids: Vec<String>,
    pub window: MonthWindow,
    pub group_by: GroupDimension,
}

/// Synchronous billing API client. One call per window per dimension; a
/// failed call aborts the run and is never retried.
pub trait BillingClient {
    /// Net amortized cost per group key for one month window.
    fn grouped_costs(&self, query: &CostQuery) -> Result<BTreeMap<String, f64>, CostError>;
}

/// Wire shape of a Cost Explorer `GetCostAndUsage` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostAndUsageResponse {
    #[serde(default)]
    pub results_by_time: Vec<ResultByTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultByTime {
    #[serde(default)]
    pub groups: Vec<CostGroup>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostGroup {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricValue {
    pub amount: String,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Flattens a response into group key → parsed amount. Groups missing the
/// requested metric or carrying a non-numeric amount are upstream faults.
pub fn flatten_response(
    response: &CostAndUsageResponse,
) -> Result<BTreeMap<String, f64>, CostError> {
    let mut costs = BTreeMap::new();
    for period in &response.results_by_time {
        for group in &period.groups {
            let key = group
                .keys
                .first()
                .ok_or_else(|| CostError::Upstream("result group has no keys".into()))?;
            let metric = group.metrics.get(NET_AMORTIZED_COST).ok_or_else(|| {
                CostError::Upstream(format!("missing {NET_AMORTIZED_COST} metric for {key}"))
            })?;
            let amount: f64 = metric.amount.trim().parse().map_err(|_| {
                CostError::Upstream(format!(
                    "non-numeric amount `{}` for {key}",
                    metric.amount
                ))
            })?;
            *costs.entry(key.clone()).or_insert(0.0) += amount;
        }
    }
    Ok(costs)
}
