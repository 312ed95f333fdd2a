//! Terminal price chart

use market_core::DailyRecord;
use rust_decimal::prelude::ToPrimitive;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Close-price sparkline that grows as the session reveals more days.
pub struct Chart {
    label: String,
    dates: Vec<String>,
    closes: Vec<f64>,
}

impl Chart {
    pub fn new(ticker: &str, visible: &[DailyRecord]) -> Self {
        let mut chart = Self {
            label: format!("{} Stock Price", ticker),
            dates: Vec::new(),
            closes: Vec::new(),
        };
        chart.extend_to(visible);
        chart
    }

    /// Append any records past the points already plotted.
    pub fn extend_to(&mut self, visible: &[DailyRecord]) {
        for record in visible.iter().skip(self.closes.len()) {
            self.dates.push(record.date_key());
            self.closes.push(record.close.to_f64().unwrap_or(0.0));
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn sparkline(&self) -> String {
        let min = self.closes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        self.closes
            .iter()
            .map(|&c| {
                if span <= f64::EPSILON {
                    BARS[BARS.len() / 2]
                } else {
                    let level = ((c - min) / span * (BARS.len() - 1) as f64).round() as usize;
                    BARS[level.min(BARS.len() - 1)]
                }
            })
            .collect()
    }

    pub fn render(&self) -> String {
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => format!(
                "{} ({} days)\n{}  {} .. {}",
                self.label,
                self.len(),
                self.sparkline(),
                first,
                last
            ),
            _ => self.label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use rust_decimal::Decimal;

    fn records(closes: &[u64]) -> Vec<DailyRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let c = Decimal::from(c);
                DailyRecord::new(start + Days::new(i as u64), c, c, c, c, 0)
            })
            .collect()
    }

    #[test]
    fn test_sparkline_scales_min_to_max() {
        let chart = Chart::new("IBM", &records(&[10, 20, 30]));
        assert_eq!(chart.sparkline(), "▁▅█");
    }

    #[test]
    fn test_flat_series_uses_middle_bar() {
        let chart = Chart::new("IBM", &records(&[5, 5, 5]));
        assert_eq!(chart.sparkline(), "▅▅▅");
    }

    #[test]
    fn test_extend_only_appends_new_points() {
        let all = records(&[1, 2, 3, 4]);
        let mut chart = Chart::new("IBM", &all[..2]);
        assert_eq!(chart.len(), 2);

        chart.extend_to(&all[..3]);
        chart.extend_to(&all[..3]);
        assert_eq!(chart.len(), 3);

        chart.extend_to(&all);
        assert_eq!(chart.len(), 4);
        assert!(chart.render().ends_with("2024-07-01 .. 2024-07-04"));
    }
}
