//! Prediction Scoring
//!
//! Compares a predicted direction against the realized move between two
//! consecutive closes.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Direction of a next-day close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Realized direction from `current` to `next`.
    ///
    /// Only a strictly higher close is `Up`; an unchanged close is `Down`.
    pub fn of_move(current: Decimal, next: Decimal) -> Self {
        if next > current {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            _ => Err(GameError::InvalidDirection(s.to_string())),
        }
    }
}

/// Result of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub predicted: Direction,
    pub actual: Direction,
    pub correct: bool,
    /// Close of the day the prediction was made on
    pub current_close: Decimal,
    /// Close of the following day
    pub next_close: Decimal,
    /// `next_close - current_close`
    pub price_delta: Decimal,
    /// `price_delta / current_close * 100`, unrounded
    pub percent_delta: Decimal,
}

impl PredictionOutcome {
    /// Percent change rounded to two places for display.
    pub fn percent_delta_display(&self) -> Decimal {
        self.percent_delta
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Score a prediction made on `current_close` against `next_close`.
pub fn score(current_close: Decimal, next_close: Decimal, predicted: Direction) -> PredictionOutcome {
    let actual = Direction::of_move(current_close, next_close);
    let price_delta = next_close - current_close;
    let percent_delta = price_delta
        .checked_div(current_close)
        .map(|ratio| ratio * Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO);

    PredictionOutcome {
        predicted,
        actual,
        correct: predicted == actual,
        current_close,
        next_close,
        price_delta,
        percent_delta,
    }
}
