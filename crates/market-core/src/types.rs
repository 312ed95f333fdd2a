use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use std::str::FromStr;

use crate::ProviderError;

/// One trading day of OHLCV data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
}

impl DailyRecord {
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// ISO `YYYY-MM-DD` form of the date, the same shape providers key on.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// A single day as delivered by the provider, every field still a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDailyBar {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

impl RawDailyBar {
    /// Parse the string fields into a typed record for `date`.
    pub fn parse(&self, date: NaiveDate) -> Result<DailyRecord, ProviderError> {
        Ok(DailyRecord {
            date,
            open: parse_price("open", &self.open)?,
            high: parse_price("high", &self.high)?,
            low: parse_price("low", &self.low)?,
            close: parse_price("close", &self.close)?,
            volume: self
                .volume
                .trim()
                .parse()
                .map_err(|e| ProviderError::Parse(format!("volume '{}': {}", self.volume, e)))?,
        })
    }
}

fn parse_price(field: &str, value: &str) -> Result<Decimal, ProviderError> {
    Decimal::from_str(value.trim())
        .map_err(|e| ProviderError::Parse(format!("{} '{}': {}", field, value, e)))
}

/// Unordered provider output keyed by ISO date string.
pub type RawDailySeries = HashMap<String, RawDailyBar>;

/// Daily records strictly increasing by date, no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DailyRecord>", into = "Vec<DailyRecord>")]
pub struct PriceSeries {
    records: Vec<DailyRecord>,
}

impl PriceSeries {
    /// Sort ascending by date and drop repeated dates, keeping the first seen.
    pub fn from_records(mut records: Vec<DailyRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        records.dedup_by_key(|r| r.date);
        Self { records }
    }

    /// Build a series from raw provider output.
    ///
    /// Rows whose date key or fields do not parse are skipped with a warning
    /// rather than failing the whole series.
    pub fn from_raw(raw: &RawDailySeries) -> Self {
        let mut records = Vec::with_capacity(raw.len());
        for (key, bar) in raw {
            let date = match NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d") {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("Skipping row with unparseable date '{}': {}", key, e);
                    continue;
                }
            };
            match bar.parse(date) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping malformed row for {}: {}", key, e),
            }
        }
        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DailyRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn first(&self) -> Option<&DailyRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&DailyRecord> {
        self.records.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.records.iter().map(|r| r.close).collect()
    }

    /// The first `len` records (clamped to the series length).
    pub fn prefix(&self, len: usize) -> &[DailyRecord] {
        &self.records[..len.min(self.records.len())]
    }

    /// Index of the first record dated on or after `date`.
    pub fn position_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.records.partition_point(|r| r.date < date);
        (idx < self.records.len()).then_some(idx)
    }

    /// Copy of the records in `range`, clamped to the series bounds.
    pub fn sub_series(&self, range: Range<usize>) -> PriceSeries {
        let end = range.end.min(self.records.len());
        let start = range.start.min(end);
        PriceSeries {
            records: self.records[start..end].to_vec(),
        }
    }
}

impl From<Vec<DailyRecord>> for PriceSeries {
    fn from(records: Vec<DailyRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<PriceSeries> for Vec<DailyRecord> {
    fn from(series: PriceSeries) -> Self {
        series.records
    }
}
