//! Session creation and ownership
//!
//! Ties the data provider, start date selector and windower together and
//! holds at most one live session. Any failure while starting leaves the
//! controller with no session.

use chrono::NaiveDate;
use market_core::DailySeriesProvider;
use rand::Rng;
use std::sync::Arc;

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::scoring::Direction;
use crate::session::{AdvanceResult, GameSession, PredictResult, SessionConfig};
use crate::window::window_raw;

pub struct GameController {
    provider: Arc<dyn DailySeriesProvider>,
    config: GameConfig,
    session: Option<GameSession>,
}

impl GameController {
    pub fn new(provider: Arc<dyn DailySeriesProvider>, config: GameConfig) -> Self {
        Self {
            provider,
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fetch history for `ticker` and begin a session on a random recent
    /// trading day. Replaces any existing session.
    pub async fn start<R: Rng + ?Sized>(
        &mut self,
        ticker: &str,
        today: NaiveDate,
        rng: &mut R,
    ) -> GameResult<&GameSession> {
        self.session = None;

        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(GameError::InvalidTicker);
        }

        tracing::info!("Fetching daily series for {}", ticker);
        let raw = self.provider.fetch_daily_series(&ticker).await?;

        let start_date = self.config.selector().pick(today, rng);
        let series = window_raw(&raw, start_date, self.config.lookback, self.config.lookahead);

        let session = GameSession::begin(
            SessionConfig {
                start_date: Some(start_date),
                ..self.config.session_config(&ticker)
            },
            series,
        )?;

        Ok(self.session.insert(session))
    }

    pub fn predict(&mut self, direction: Direction) -> PredictResult {
        match self.session.as_mut() {
            Some(session) => session.predict(direction),
            None => PredictResult::Ignored,
        }
    }

    pub fn advance(&mut self) -> AdvanceResult {
        match self.session.as_mut() {
            Some(session) => session.advance(),
            None => AdvanceResult::Ignored,
        }
    }

    /// Drop the current session, if any.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(session_id = %session.id(), score = session.score(), "Session reset");
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.session.is_some()
    }
}
