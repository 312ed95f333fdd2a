//! Series windowing around a start date

use chrono::NaiveDate;
use market_core::{PriceSeries, RawDailySeries};

/// Cut a window of `lookback` records before the first record dated on or
/// after `start_date`, that record itself, and the records after it up to
/// `lookahead` records from the match (exclusive).
///
/// When every record predates `start_date` the last record is used as the
/// match. Both ends clamp to the series, so the result may be shorter than
/// `lookback + lookahead`; callers decide whether it is long enough.
pub fn window_series(
    series: &PriceSeries,
    start_date: NaiveDate,
    lookback: usize,
    lookahead: usize,
) -> PriceSeries {
    if series.is_empty() {
        return PriceSeries::default();
    }

    let matched = series
        .position_on_or_after(start_date)
        .unwrap_or(series.len() - 1);

    let from = matched.saturating_sub(lookback);
    let to = matched.saturating_add(lookahead);

    tracing::debug!(
        "Windowing {} records around {} (match index {}, range {}..{})",
        series.len(),
        start_date,
        matched,
        from,
        to.min(series.len())
    );

    series.sub_series(from..to)
}

/// Sort and de-duplicate raw provider output, then window it.
pub fn window_raw(
    raw: &RawDailySeries,
    start_date: NaiveDate,
    lookback: usize,
    lookahead: usize,
) -> PriceSeries {
    window_series(&PriceSeries::from_raw(raw), start_date, lookback, lookahead)
}
