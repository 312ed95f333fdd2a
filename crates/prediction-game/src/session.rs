//! Game Session
//!
//! Steps through a windowed price series one day at a time. Each day the
//! player predicts the next close, the prediction is scored immediately, and
//! an explicit advance moves the cursor forward.
//!
//! Out-of-sequence calls (predicting twice, advancing before predicting,
//! anything after the session ended) are absorbed as `Ignored` rather than
//! raised, since they come from duplicate UI events.

use chrono::NaiveDate;
use market_core::{DailyRecord, PriceSeries};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GameError, GameResult};
use crate::scoring::{score, Direction, PredictionOutcome};

/// Settings for starting a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Ticker being replayed
    pub ticker: String,
    /// Date the window was cut around
    pub start_date: Option<NaiveDate>,
    /// Historical days shown before the first predictable day
    pub lookback: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ticker: String::new(),
            start_date: None,
            lookback: 7,
        }
    }
}

/// Where the current day stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the player's call on the current day
    AwaitingPrediction,
    /// Current day scored, waiting for advance
    PredictionMade,
    /// No more data; only a new session can continue play
    Ended,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::AwaitingPrediction => write!(f, "awaiting_prediction"),
            SessionPhase::PredictionMade => write!(f, "prediction_made"),
            SessionPhase::Ended => write!(f, "ended"),
        }
    }
}

/// The day currently shown to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub close: Decimal,
    /// Cursor position in the session's series
    pub index: usize,
    /// No record exists after this day; the next prediction ends the game
    pub is_final_day: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictResult {
    Scored(PredictionOutcome),
    /// No next-day record to compare against; the session has ended
    NoMoreData,
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult {
    Day(DayView),
    Ended,
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    id: Uuid,
    ticker: String,
    start_date: Option<NaiveDate>,
    series: PriceSeries,
    lookback: usize,
    cursor: usize,
    score: u32,
    days_played: u32,
    pending: Option<Direction>,
    last_outcome: Option<PredictionOutcome>,
    phase: SessionPhase,
}

impl GameSession {
    /// Start a session with the cursor `lookback` records into `series`.
    ///
    /// Requires at least `lookback + 1` records so the first day has its full
    /// history and a record of its own.
    pub fn begin(config: SessionConfig, series: PriceSeries) -> GameResult<Self> {
        let required = config.lookback + 1;
        if series.len() < required {
            return Err(GameError::InsufficientData {
                available: series.len(),
                required,
            });
        }

        let session = Self {
            id: Uuid::new_v4(),
            ticker: config.ticker,
            start_date: config.start_date,
            series,
            lookback: config.lookback,
            cursor: config.lookback,
            score: 0,
            days_played: 0,
            pending: None,
            last_outcome: None,
            phase: SessionPhase::AwaitingPrediction,
        };

        tracing::info!(
            session_id = %session.id,
            ticker = %session.ticker,
            records = session.series.len(),
            "Session started on {}",
            session.current_day().date
        );

        Ok(session)
    }

    /// Score `direction` against the next day's close.
    pub fn predict(&mut self, direction: Direction) -> PredictResult {
        if self.phase != SessionPhase::AwaitingPrediction {
            tracing::debug!(session_id = %self.id, phase = %self.phase, "Ignoring prediction");
            return PredictResult::Ignored;
        }

        let Some(next) = self.series.get(self.cursor + 1) else {
            self.phase = SessionPhase::Ended;
            tracing::info!(session_id = %self.id, score = self.score, "Session ended: no more data");
            return PredictResult::NoMoreData;
        };

        let outcome = score(self.current_day().close, next.close, direction);
        self.pending = Some(direction);
        self.days_played += 1;
        if outcome.correct {
            self.score += 1;
        }

        tracing::info!(
            session_id = %self.id,
            predicted = %outcome.predicted,
            actual = %outcome.actual,
            correct = outcome.correct,
            score = self.score,
            "Prediction scored"
        );

        self.last_outcome = Some(outcome.clone());
        self.phase = SessionPhase::PredictionMade;
        PredictResult::Scored(outcome)
    }

    /// Move to the next day once the current one has been scored.
    pub fn advance(&mut self) -> AdvanceResult {
        if self.phase != SessionPhase::PredictionMade {
            tracing::debug!(session_id = %self.id, phase = %self.phase, "Ignoring advance");
            return AdvanceResult::Ignored;
        }

        if self.cursor + 1 >= self.series.len() {
            self.phase = SessionPhase::Ended;
            tracing::info!(session_id = %self.id, score = self.score, "Session ended");
            return AdvanceResult::Ended;
        }

        self.cursor += 1;
        self.pending = None;
        self.last_outcome = None;
        self.phase = SessionPhase::AwaitingPrediction;

        let view = self.day_view();
        tracing::debug!(
            session_id = %self.id,
            date = %view.date,
            final_day = view.is_final_day,
            "Advanced"
        );
        AdvanceResult::Day(view)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn days_played(&self) -> u32 {
        self.days_played
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn pending_prediction(&self) -> Option<Direction> {
        self.pending
    }

    /// Outcome of the current day, if it has been scored.
    pub fn last_outcome(&self) -> Option<&PredictionOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn can_predict(&self) -> bool {
        self.phase == SessionPhase::AwaitingPrediction
    }

    pub fn can_advance(&self) -> bool {
        self.phase == SessionPhase::PredictionMade
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// A record exists after the cursor to predict against.
    pub fn has_next_day(&self) -> bool {
        self.cursor + 1 < self.series.len()
    }

    pub fn current_day(&self) -> &DailyRecord {
        // begin guarantees len > lookback and the cursor never passes the last record
        &self.series.records()[self.cursor]
    }

    pub fn day_view(&self) -> DayView {
        let day = self.current_day();
        DayView {
            date: day.date,
            close: day.close,
            index: self.cursor,
            is_final_day: !self.has_next_day(),
        }
    }

    /// Records up to and including today, for charting.
    pub fn visible_records(&self) -> &[DailyRecord] {
        self.series.prefix(self.cursor + 1)
    }

    /// Days that can be scored over the whole session.
    pub fn predictable_days(&self) -> usize {
        self.series.len().saturating_sub(self.lookback + 1)
    }

    pub fn accuracy_pct(&self) -> f64 {
        if self.days_played == 0 {
            return 0.0;
        }
        (self.score as f64 / self.days_played as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use rust_decimal_macros::dec;

    fn series_from_closes(closes: &[Decimal]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let records = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| DailyRecord::new(start + Days::new(i as u64), c, c, c, c, 500))
            .collect();
        PriceSeries::from_records(records)
    }

    fn ramp(len: usize) -> PriceSeries {
        let closes: Vec<Decimal> = (0..len).map(|i| Decimal::from(100 + i as u64)).collect();
        series_from_closes(&closes)
    }

    fn config(lookback: usize) -> SessionConfig {
        SessionConfig {
            ticker: "TEST".to_string(),
            lookback,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_begin_sets_cursor_after_lookback() {
        let session = GameSession::begin(SessionConfig::default(), ramp(20)).unwrap();

        assert_eq!(session.cursor(), 7);
        assert_eq!(session.score(), 0);
        assert_eq!(session.pending_prediction(), None);
        assert_eq!(session.phase(), SessionPhase::AwaitingPrediction);
        assert_eq!(session.current_day().close, dec!(107));
        assert_eq!(session.visible_records().len(), 8);
    }

    #[test]
    fn test_begin_rejects_short_series() {
        let err = GameSession::begin(SessionConfig::default(), ramp(5)).unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientData { available: 5, required: 8 }
        ));

        assert!(GameSession::begin(SessionConfig::default(), ramp(7)).is_err());
        assert!(GameSession::begin(SessionConfig::default(), ramp(8)).is_ok());
    }

    #[test]
    fn test_correct_up_prediction() {
        let mut session = GameSession::begin(config(0), series_from_closes(&[dec!(10), dec!(12)])).unwrap();

        let PredictResult::Scored(outcome) = session.predict(Direction::Up) else {
            panic!("expected a scored prediction");
        };
        assert!(outcome.correct);
        assert_eq!(outcome.price_delta, dec!(2));
        assert_eq!(outcome.percent_delta_display(), dec!(20.00));
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), SessionPhase::PredictionMade);
        assert_eq!(session.pending_prediction(), Some(Direction::Up));
    }

    #[test]
    fn test_flat_close_scores_as_down() {
        let mut session = GameSession::begin(config(0), series_from_closes(&[dec!(10), dec!(10)])).unwrap();

        let PredictResult::Scored(outcome) = session.predict(Direction::Up) else {
            panic!("expected a scored prediction");
        };
        assert_eq!(outcome.actual, Direction::Down);
        assert!(!outcome.correct);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_predict_on_last_day_ends_session() {
        // Exactly lookback + 1 records: the first day is already the last.
        let mut session = GameSession::begin(SessionConfig::default(), ramp(8)).unwrap();
        assert!(session.day_view().is_final_day);

        assert_eq!(session.predict(Direction::Up), PredictResult::NoMoreData);
        assert!(session.is_ended());
        assert_eq!(session.score(), 0);
        assert_eq!(session.days_played(), 0);

        assert_eq!(session.predict(Direction::Down), PredictResult::Ignored);
        assert_eq!(session.advance(), AdvanceResult::Ignored);
    }

    #[test]
    fn test_double_predict_is_ignored() {
        let mut session = GameSession::begin(SessionConfig::default(), ramp(12)).unwrap();

        assert!(matches!(session.predict(Direction::Up), PredictResult::Scored(_)));
        assert_eq!(session.score(), 1);

        assert_eq!(session.predict(Direction::Down), PredictResult::Ignored);
        assert_eq!(session.score(), 1);
        assert_eq!(session.pending_prediction(), Some(Direction::Up));
        assert!(!session.can_predict());
        assert!(session.can_advance());
    }

    #[test]
    fn test_advance_before_predict_is_ignored() {
        let mut session = GameSession::begin(SessionConfig::default(), ramp(12)).unwrap();

        assert_eq!(session.advance(), AdvanceResult::Ignored);
        assert_eq!(session.cursor(), 7);
    }

    #[test]
    fn test_advance_moves_to_next_day() {
        let mut session = GameSession::begin(SessionConfig::default(), ramp(12)).unwrap();
        session.predict(Direction::Down);

        let AdvanceResult::Day(view) = session.advance() else {
            panic!("expected a new day");
        };
        assert_eq!(view.index, 8);
        assert_eq!(view.close, dec!(108));
        assert!(!view.is_final_day);
        assert_eq!(session.pending_prediction(), None);
        assert!(session.last_outcome().is_none());
        assert!(session.can_predict());
        assert_eq!(session.visible_records().len(), 9);
    }

    #[test]
    fn test_final_day_flag() {
        let mut session = GameSession::begin(SessionConfig::default(), ramp(10)).unwrap();

        session.predict(Direction::Up);
        let AdvanceResult::Day(view) = session.advance() else {
            panic!("expected a new day");
        };
        assert!(!view.is_final_day);

        session.predict(Direction::Up);
        let AdvanceResult::Day(view) = session.advance() else {
            panic!("expected a new day");
        };
        assert!(view.is_final_day);
        assert_eq!(view.index, 9);
    }

    #[test]
    fn test_full_playthrough_visits_every_predictable_day() {
        for len in [8usize, 9, 15, 37] {
            let series = ramp(len);
            let mut session = GameSession::begin(SessionConfig::default(), series).unwrap();
            let mut scored = 0;

            loop {
                match session.predict(Direction::Up) {
                    PredictResult::Scored(_) => {
                        scored += 1;
                        assert!(matches!(session.advance(), AdvanceResult::Day(_)));
                    }
                    PredictResult::NoMoreData => break,
                    PredictResult::Ignored => panic!("unexpected ignore"),
                }
            }

            assert_eq!(scored, len - 7 - 1);
            assert_eq!(session.predictable_days(), len - 8);
            // Every close in the ramp rises.
            assert_eq!(session.score() as usize, scored);
            assert!(session.is_ended());
        }
    }

    #[test]
    fn test_accuracy() {
        let closes = [dec!(1), dec!(1), dec!(2), dec!(1), dec!(3)];
        let mut session = GameSession::begin(config(0), series_from_closes(&closes)).unwrap();
        assert_eq!(session.accuracy_pct(), 0.0);

        session.predict(Direction::Up); // flat, wrong
        session.advance();
        session.predict(Direction::Up); // rise, right
        session.advance();
        session.predict(Direction::Down); // fall, right
        session.advance();
        session.predict(Direction::Down); // rise, wrong

        assert_eq!(session.days_played(), 4);
        assert_eq!(session.score(), 2);
        assert!((session.accuracy_pct() - 50.0).abs() < 1e-9);
    }
}
