//! Billing client backed by the `aws` CLI. Credential and region resolution
//! stay with the CLI, matching its standard provider chain.

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::process::Command;

use serde_json::json;

use super::{flatten_response, BillingClient, CostAndUsageResponse, CostQuery, NET_AMORTIZED_COST};
use crate::errors::CostError;

/// Env var overriding the `aws` executable, used by tests to stub the API.
pub const AWS_BIN_ENV: &str = "COST_SUMMARY_AWS_BIN";

pub struct AwsCliClient {
    binary: PathBuf,
}

impl AwsCliClient {
    pub fn new() -> Self {
        let binary = env::var_os(AWS_BIN_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("aws"));
        Self { binary }
    }
}

impl Default for AwsCliClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BillingClient for AwsCliClient {
    fn grouped_costs(&self, query: &CostQuery) -> Result<BTreeMap<String, f64>, CostError> {
        let filter = json!({
            "Dimensions": { "Key": "LINKED_ACCOUNT", "Values": query.account_ids }
        });
        let group_by = json!([{ "Type": "DIMENSION", "Key": query.group_by.key() }]);

        let output = Command::new(&self.binary)
            .arg("ce")
            .arg("get-cost-and-usage")
            .arg("--time-period")
            .arg(format!(
                "Start={},End={}",
                query.window.start,
                query.window.exclusive_end()
            ))
            .arg("--granularity")
            .arg("MONTHLY")
            .arg("--filter")
            .arg(filter.to_string())
            .arg("--group-by")
            .arg(group_by.to_string())
            .arg("--metrics")
            .arg(NET_AMORTIZED_COST)
            .arg("--output")
            .arg("json")
            .output()
            .map_err(|err| {
                CostError::Upstream(format!(
                    "failed to launch {}: {err}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CostError::Upstream(format!(
                "billing query exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let response: CostAndUsageResponse = serde_json::from_slice(&output.stdout)
            .map_err(|err| CostError::Upstream(format!("malformed billing response: {err}")))?;
        flatten_response(&response)
    }
}
