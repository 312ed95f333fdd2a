//! Random start date selection

use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::is_trading_day;

/// Samples a recent trading day to start a session on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartDateSelector {
    /// Closest allowed offset from today, in calendar days
    pub min_days_ago: u32,
    /// Furthest allowed offset from today, in calendar days
    pub max_days_ago: u32,
    /// Candidates drawn before giving up and accepting the last one
    pub max_attempts: u32,
}

impl Default for StartDateSelector {
    fn default() -> Self {
        Self {
            min_days_ago: 7,
            max_days_ago: 100,
            max_attempts: 100,
        }
    }
}

impl StartDateSelector {
    pub fn new(min_days_ago: u32, max_days_ago: u32, max_attempts: u32) -> Self {
        Self {
            min_days_ago,
            max_days_ago,
            max_attempts,
        }
    }

    /// Draw offsets uniformly from `[min_days_ago, max_days_ago]` until the
    /// candidate is a trading day.
    ///
    /// After `max_attempts` rejections the last candidate is returned anyway,
    /// so this always terminates but may hand back a weekend or holiday.
    pub fn pick<R: Rng + ?Sized>(&self, today: NaiveDate, rng: &mut R) -> NaiveDate {
        let lo = self.min_days_ago.min(self.max_days_ago);
        let hi = self.min_days_ago.max(self.max_days_ago);
        let attempts = self.max_attempts.max(1);

        let mut candidate = today;
        for attempt in 1..=attempts {
            let days_ago = rng.gen_range(lo..=hi);
            candidate = today
                .checked_sub_days(Days::new(u64::from(days_ago)))
                .unwrap_or(NaiveDate::MIN);

            if is_trading_day(candidate) {
                tracing::debug!("Picked start date {} after {} attempt(s)", candidate, attempt);
                return candidate;
            }
        }

        tracing::warn!(
            "No trading day found in {} attempts, falling back to {}",
            attempts,
            candidate
        );
        candidate
    }
}
