use thiserror::Error;

/// Error type that captures report-run failures.
#[derive(Debug, Error)]
pub enum CostError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Billing API error: {0}")]
    Upstream(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
