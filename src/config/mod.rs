use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CostError;
use crate::utils;

const CONFIG_FILE: &str = "config.json";

/// Prior-month spend above which an account's change is called out.
pub const DEFAULT_SIGNIFICANCE_FLOOR: f64 = 1500.0;
/// Minimum four-month increase before an upward trend is reported.
pub const DEFAULT_TREND_INCREASE_FLOOR: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    #[serde(default = "default_significance_floor")]
    pub significance_floor: f64,
    #[serde(default = "default_trend_increase_floor")]
    pub trend_increase_floor: f64,
}

fn default_significance_floor() -> f64 {
    DEFAULT_SIGNIFICANCE_FLOOR
}

fn default_trend_increase_floor() -> f64 {
    DEFAULT_TREND_INCREASE_FLOOR
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            significance_floor: DEFAULT_SIGNIFICANCE_FLOOR,
            trend_increase_floor: DEFAULT_TREND_INCREASE_FLOOR,
        }
    }
}

/// Static run configuration: the linked accounts to report on and the
/// signal thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Account id → display name.
    pub accounts: BTreeMap<String, String>,
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl Config {
    /// Loads the configuration file. Missing or invalid files are fatal: a
    /// report over zero accounts is never what a batch run wants.
    pub fn load(path: &Path) -> Result<Self, CostError> {
        let data = fs::read_to_string(path)
            .map_err(|err| CostError::Config(format!("cannot read {}: {err}", path.display())))?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| CostError::Config(format!("invalid {}: {err}", path.display())))?;
        if config.accounts.is_empty() {
            return Err(CostError::Config(format!(
                "{} lists no accounts",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Default location: `$COST_SUMMARY_HOME/config.json`, falling back to
    /// `~/.cost_summary/config.json`.
    pub fn default_path() -> PathBuf {
        utils::app_data_dir().join(CONFIG_FILE)
    }

    pub fn account_ids(&self) -> Vec<String> {
        self.accounts.keys().cloned().collect()
    }

    /// Display name for an account, `N/A` when unmapped.
    pub fn display_name(&self, account_id: &str) -> &str {
        self.accounts
            .get(account_id)
            .map(String::as_str)
            .unwrap_or("N/A")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn thresholds_default_when_omitted() {
        let config: Config =
            serde_json::from_str(r#"{ "accounts": { "1": "Sandbox" } }"#).unwrap();
        assert_eq!(config.thresholds.significance_floor, 1500.0);
        assert_eq!(config.thresholds.trend_increase_floor, 100.0);
    }

    #[test]
    fn display_name_falls_back_to_na() {
        let config: Config =
            serde_json::from_str(r#"{ "accounts": { "1": "Sandbox" } }"#).unwrap();
        assert_eq!(config.display_name("1"), "Sandbox");
        assert_eq!(config.display_name("2"), "N/A");
    }

    #[test]
    fn load_rejects_missing_file() {
        let err = Config::load(Path::new("/nonexistent/config.json"))
            .expect_err("missing file should fail");
        assert!(matches!(err, CostError::Config(_)), "got {err:?}");
    }

    #[test]
    fn load_rejects_empty_account_map() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "accounts": {{}} }}"#).unwrap();
        let err = Config::load(file.path()).expect_err("empty accounts should fail");
        let message = format!("{err}");
        assert!(message.contains("no accounts"), "unexpected error: {message}");
    }

    #[test]
    fn load_reads_overridden_thresholds() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
              "accounts": {{ "1": "Sandbox" }},
              "thresholds": {{ "significance_floor": 500.0, "trend_increase_floor": 25.0 }}
            }}"#
        )
        .unwrap();
        let config = Config::load(file.path()).expect("load succeeds");
        assert_eq!(config.thresholds.significance_floor, 500.0);
        assert_eq!(config.thresholds.trend_increase_floor, 25.0);
    }
}
