use thiserror::Error;

/// Failures reported by a daily price data provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Invalid stock ticker symbol: {0}")]
    InvalidTicker(String),

    #[error("API call frequency limit reached. Please try again later. ({0})")]
    RateLimited(String),

    #[error("No data available for this stock ticker: {0}")]
    NoData(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
