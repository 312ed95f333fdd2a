//! Prediction Game
//!
//! Replays a window of historical daily prices for one ticker and asks the
//! player to call each next-day close as up or down, keeping a running score.
//! Everything here is pure state logic; fetching and rendering live with the
//! caller.

pub mod calendar;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod scoring;
pub mod session;
pub mod start_date;
pub mod window;

pub use calendar::{is_holiday, is_trading_day, is_weekday, thanksgiving};
pub use config::GameConfig;
pub use controller::GameController;
pub use error::{GameError, GameResult};
pub use scoring::{score, Direction, PredictionOutcome};
pub use session::{AdvanceResult, DayView, GameSession, PredictResult, SessionConfig, SessionPhase};
pub use start_date::StartDateSelector;
pub use window::{window_raw, window_series};
