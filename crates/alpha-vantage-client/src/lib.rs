use async_trait::async_trait;
use market_core::{DailySeriesProvider, ProviderError, RawDailySeries};
use reqwest::Client;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const DAILY_SERIES_KEY: &str = "Time Series (Daily)";

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            // Remove timestamps outside the window
            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Wait until the oldest request falls out of the window
            let sleep_dur = match ts.front() {
                Some(&oldest) => (oldest + self.window).duration_since(now) + Duration::from_millis(50),
                None => Duration::from_millis(50),
            };
            drop(ts);
            tracing::debug!(
                "Rate limiter: waiting {:.1}s for Alpha Vantage API slot",
                sleep_dur.as_secs_f64()
            );
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

#[derive(Clone)]
pub struct AlphaVantageClient {
    api_key: String,
    base_url: String,
    client: Client,
    rate_limiter: RateLimiter,
}

impl AlphaVantageClient {
    pub fn new(api_key: String) -> Self {
        // Free tier allows 5 requests per minute.
        let rate_limit: usize = std::env::var("ALPHAVANTAGE_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            client,
            rate_limiter: RateLimiter::new(rate_limit, Duration::from_secs(60)),
        }
    }

    /// Point the client at a different query endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ProviderError> {
        let request = builder.build().map_err(|e| ProviderError::Http(e.to_string()))?;

        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| ProviderError::Http("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(req_clone)
                .await
                .map_err(|e| ProviderError::Http(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 15u64;
            tracing::warn!(
                "Alpha Vantage 429 rate limited, waiting {}s before retry {}/3",
                wait_secs,
                attempt + 1
            );
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(ProviderError::RateLimited(
            "rate limited by Alpha Vantage after 3 retries".to_string(),
        ))
    }

    /// Full daily OHLCV history for `symbol`, keyed by ISO date string.
    pub async fn get_daily_series(&self, symbol: &str) -> Result<RawDailySeries, ProviderError> {
        let response = self
            .send_request(self.client.get(&self.base_url).query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "full"),
                ("apikey", self.api_key.as_str()),
            ]))
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Http(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let series = parse_daily_response(symbol, body)?;
        tracing::debug!("Fetched {} daily rows for {}", series.len(), symbol);
        Ok(series)
    }
}

#[async_trait]
impl DailySeriesProvider for AlphaVantageClient {
    async fn fetch_daily_series(&self, ticker: &str) -> Result<RawDailySeries, ProviderError> {
        self.get_daily_series(ticker).await
    }
}

/// Interpret a `TIME_SERIES_DAILY` payload.
///
/// Alpha Vantage reports most failures with HTTP 200 and a sentinel key in
/// the body, so the body has to be inspected before the series is read.
pub fn parse_daily_response(symbol: &str, mut body: Value) -> Result<RawDailySeries, ProviderError> {
    if let Some(msg) = body.get("Error Message").and_then(Value::as_str) {
        tracing::debug!("Alpha Vantage rejected {}: {}", symbol, msg);
        return Err(ProviderError::InvalidTicker(symbol.to_string()));
    }

    for key in ["Note", "Information"] {
        if let Some(msg) = body.get(key).and_then(Value::as_str) {
            tracing::warn!("Alpha Vantage throttled request for {}: {}", symbol, msg);
            return Err(ProviderError::RateLimited(msg.to_string()));
        }
    }

    let series = match body.get_mut(DAILY_SERIES_KEY) {
        Some(v) => v.take(),
        None => return Err(ProviderError::NoData(symbol.to_string())),
    };

    let parsed: RawDailySeries =
        serde_json::from_value(series).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if parsed.is_empty() {
        return Err(ProviderError::NoData(symbol.to_string()));
    }

    Ok(parsed)
}
