//! stock-predict: guess whether a stock closes up or down the next day.
//!
//! Replays a few weeks of real daily closes starting from a random recent
//! trading day. Enter a ticker, then call each day up or down.
//!
//! Usage:
//!   ALPHAVANTAGE_API_KEY=... cargo run -p game-cli
//!   RUST_LOG=prediction_game=debug cargo run -p game-cli

mod chart;
mod command;

use alpha_vantage_client::AlphaVantageClient;
use anyhow::Context;
use chart::Chart;
use chrono::Utc;
use command::{Command, HELP};
use prediction_game::format::{
    final_score_message, format_date, format_price, game_started_message, outcome_message,
};
use prediction_game::{AdvanceResult, GameConfig, GameController, GameSession, PredictResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "game_cli=info,prediction_game=info,alpha_vantage_client=warn".into()
            }),
        )
        .init();

    let api_key = std::env::var("ALPHAVANTAGE_API_KEY")
        .context("ALPHAVANTAGE_API_KEY must be set")?;

    let config = GameConfig::from_env();
    config.validate()?;
    tracing::info!(
        "Lookback {} days, lookahead {} days, start {}-{} days ago",
        config.lookback,
        config.lookahead,
        config.min_days_ago,
        config.max_days_ago
    );

    let provider = Arc::new(AlphaVantageClient::new(api_key));
    let mut controller = GameController::new(provider, config);
    let mut rng = StdRng::from_entropy();
    let mut chart: Option<Chart> = None;

    println!("Stock Market Prediction Game");
    println!("Enter a stock ticker symbol to start (q to quit).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = Command::parse(&line);

        if !controller.is_started() {
            match command {
                Command::Quit => break,
                Command::Help => println!("Enter a stock ticker symbol, e.g. AAPL."),
                _ => {
                    println!("Loading stock data...");
                    let today = Utc::now().date_naive();
                    match controller.start(&line, today, &mut rng).await {
                        Ok(session) => {
                            println!("{}", game_started_message(session.ticker()));
                            let new_chart = Chart::new(session.ticker(), session.visible_records());
                            print_day(session, &new_chart);
                            chart = Some(new_chart);
                        }
                        Err(e) => {
                            tracing::debug!("Start failed: {:?}", e);
                            println!("{}", e);
                        }
                    }
                }
            }
            continue;
        }

        match command {
            Command::Quit => break,
            Command::Help | Command::Text(_) => println!("{}", HELP),
            Command::Reset => {
                controller.reset();
                chart = None;
                println!("Enter a stock ticker symbol to start (q to quit).");
            }
            Command::Predict(direction) => match controller.predict(direction) {
                PredictResult::Scored(outcome) => {
                    println!("{}", outcome_message(&outcome));
                    if let Some(session) = controller.session() {
                        println!("Score: {}", session.score());
                    }
                    println!("Press n for the next day.");
                }
                PredictResult::NoMoreData => {
                    println!("No more data available for prediction. Game over!");
                    print_game_over(&controller);
                }
                PredictResult::Ignored => println!("Already predicted today. Press n for the next day."),
            },
            Command::NextDay => match controller.advance() {
                AdvanceResult::Day(_) => {
                    if let (Some(session), Some(chart)) = (controller.session(), chart.as_mut()) {
                        chart.extend_to(session.visible_records());
                        print_day(session, chart);
                    }
                }
                AdvanceResult::Ended => {
                    println!("No more data available. Game over!");
                    print_game_over(&controller);
                }
                AdvanceResult::Ignored => println!("Make a prediction first: u or d."),
            },
        }
    }

    Ok(())
}

fn print_day(session: &GameSession, chart: &Chart) {
    let day = session.day_view();
    println!();
    println!("{}", chart.render());
    println!(
        "{} | {} | close {} | score {}",
        session.ticker(),
        format_date(day.date),
        format_price(day.close),
        session.score()
    );

    if day.is_final_day {
        println!("Game Over!");
        println!("{}", final_score_message(session.score()));
        println!("Press r to play again.");
    } else {
        println!("Will {} go up or down tomorrow? {}", session.ticker(), HELP);
    }
}

fn print_game_over(controller: &GameController) {
    if let Some(session) = controller.session() {
        println!("{}", final_score_message(session.score()));
        println!(
            "Accuracy: {:.1}% over {} days",
            session.accuracy_pct(),
            session.days_played()
        );
    }
    println!("Press r to play again.");
}
