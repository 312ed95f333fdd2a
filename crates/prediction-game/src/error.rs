use market_core::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Please enter a stock ticker symbol")]
    InvalidTicker,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Not enough historical data available for this stock ({available} days, need {required})")]
    InsufficientData { available: usize, required: usize },

    #[error("Invalid direction: {0} (expected up or down)")]
    InvalidDirection(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type GameResult<T> = Result<T, GameError>;
