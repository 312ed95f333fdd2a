use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::session::SessionConfig;
use crate::start_date::StartDateSelector;

/// Tunables for how a game is set up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Historical days shown before the first predictable day
    pub lookback: usize,
    /// Records kept from the start date onward
    pub lookahead: usize,
    pub min_days_ago: u32,
    pub max_days_ago: u32,
    /// Start date draws before accepting a non-trading day
    pub max_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lookback: 7,
            lookahead: 30,
            min_days_ago: 7,
            max_days_ago: 100,
            max_attempts: 100,
        }
    }
}

impl GameConfig {
    /// Defaults overridden by any parseable `GAME_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            lookback: env_or("GAME_LOOKBACK", defaults.lookback),
            lookahead: env_or("GAME_LOOKAHEAD", defaults.lookahead),
            min_days_ago: env_or("GAME_MIN_DAYS_AGO", defaults.min_days_ago),
            max_days_ago: env_or("GAME_MAX_DAYS_AGO", defaults.max_days_ago),
            max_attempts: env_or("GAME_MAX_ATTEMPTS", defaults.max_attempts),
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.lookback == 0 {
            return Err(GameError::InvalidConfig("lookback must be at least 1".to_string()));
        }
        if self.lookahead == 0 {
            return Err(GameError::InvalidConfig("lookahead must be at least 1".to_string()));
        }
        if self.min_days_ago > self.max_days_ago {
            return Err(GameError::InvalidConfig(format!(
                "min_days_ago ({}) must not exceed max_days_ago ({})",
                self.min_days_ago, self.max_days_ago
            )));
        }
        Ok(())
    }

    pub fn selector(&self) -> StartDateSelector {
        StartDateSelector::new(self.min_days_ago, self.max_days_ago, self.max_attempts)
    }

    pub fn session_config(&self, ticker: &str) -> SessionConfig {
        SessionConfig {
            ticker: ticker.to_string(),
            start_date: None,
            lookback: self.lookback,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.lookback, 7);
        assert_eq!(config.lookahead, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let config = GameConfig {
            min_days_ago: 50,
            max_days_ago: 10,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let config = GameConfig {
            lookback: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GameConfig {
            lookahead: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("GAME_TEST_ONLY_GARBAGE", "seven");
        assert_eq!(env_or("GAME_TEST_ONLY_GARBAGE", 7usize), 7);
        std::env::set_var("GAME_TEST_ONLY_NUMBER", " 12 ");
        assert_eq!(env_or("GAME_TEST_ONLY_NUMBER", 7usize), 12);
        assert_eq!(env_or("GAME_TEST_ONLY_MISSING", 3u32), 3);
    }

    #[test]
    fn test_session_config_carries_lookback() {
        let config = GameConfig {
            lookback: 5,
            ..GameConfig::default()
        };
        let session = config.session_config("AAPL");
        assert_eq!(session.lookback, 5);
        assert_eq!(session.ticker, "AAPL");
    }
}
