//! Display strings for dates, prices and outcomes

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::scoring::PredictionOutcome;

fn cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// e.g. "Monday, March 3, 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// e.g. "$123.40"
pub fn format_price(price: Decimal) -> String {
    format!("${:.2}", cents(price))
}

/// Signed dollar change, e.g. "+$2.00" or "-$1.50"
pub fn format_change(delta: Decimal) -> String {
    if delta.is_sign_negative() && !cents(delta).is_zero() {
        format!("-${:.2}", cents(delta.abs()))
    } else {
        format!("+${:.2}", cents(delta.abs()))
    }
}

/// Percent with two decimals, no sign padding, e.g. "20.00" or "-3.45"
pub fn format_percent(percent: Decimal) -> String {
    format!("{:.2}", cents(percent))
}

/// Two-line verdict for a scored prediction.
pub fn outcome_message(outcome: &PredictionOutcome) -> String {
    let verdict = if outcome.correct {
        format!("🎉 Correct! The price went {}.", outcome.actual)
    } else {
        format!("❌ Wrong! The price went {}.", outcome.actual)
    };

    format!(
        "{}\nPrice changed from {} to {} ({}, {}%)",
        verdict,
        format_price(outcome.current_close),
        format_price(outcome.next_close),
        format_change(outcome.price_delta),
        format_percent(outcome.percent_delta_display()),
    )
}

pub fn game_started_message(ticker: &str) -> String {
    format!(
        "Game started! Predict whether {} will go up or down tomorrow.",
        ticker
    )
}

pub fn final_score_message(score: u32) -> String {
    format!("Final Score: {} correct predictions", score)
}
