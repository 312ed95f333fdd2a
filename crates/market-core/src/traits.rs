use async_trait::async_trait;
use crate::{ProviderError, RawDailySeries};

/// Source of raw daily OHLCV history for a ticker.
#[async_trait]
pub trait DailySeriesProvider: Send + Sync {
    async fn fetch_daily_series(&self, ticker: &str) -> Result<RawDailySeries, ProviderError>;
}
