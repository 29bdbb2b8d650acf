//! Wires a complete pipeline against the paper venue.
//!
//! The binary is a thin shell around `wire`; tests drive the same wiring
//! with scripted bars instead of the random walk.

use anyhow::Context;
use chrono::Duration;
use execution_engine::{OrderExecutor, RiskManager};
use gateway_paper::{PaperVenue, RandomWalk};
use log::{info, warn};
use portfolio_manager::PositionSizer;
use rust_decimal::Decimal;
use trading::SymbolInfo;
use trading_core::settings::Settings;
use trading_core::{Collaborators, ConfigError, Pipeline, Session, TradingDirector};

/// Bars back-filled per symbol so the first poll already has history.
pub const WARMUP_BARS: usize = 200;

/// Contract specs for a six-letter FX symbol; JPY quotes get 3 decimals.
pub fn symbol_info(symbol: &str, fallback_quote: &str) -> SymbolInfo {
    let quote = symbol.get(3..6).unwrap_or(fallback_quote).to_uppercase();
    let info = SymbolInfo::new(symbol, quote.as_str());
    if quote == "JPY" {
        info.with_tick(Decimal::new(1, 3), Decimal::new(1, 3))
    } else {
        info
    }
}

/// A paper venue listing every configured symbol, each driven by its own
/// seeded random walk.
pub fn paper_venue(settings: &Settings) -> PaperVenue {
    let paper = &settings.paper;
    let mut venue =
        PaperVenue::new(paper.currency.as_str(), paper.equity).with_spread_points(paper.spread_points);
    for symbol in &settings.symbols {
        venue = venue.with_symbol(symbol_info(symbol, &paper.currency));
    }

    let interval = Duration::milliseconds(i64::try_from(paper.bar_interval_ms).unwrap_or(i64::MAX));
    for (i, symbol) in settings.symbols.iter().enumerate() {
        let decimals = if symbol_info(symbol, &paper.currency).get_quote_currency() == "JPY" {
            3
        } else {
            5
        };
        let walk = RandomWalk::new(paper.start_price, paper.seed.wrapping_add(i as u64))
            .with_interval(interval)
            .with_decimals(decimals)
            .with_max_step_bp(paper.max_step_bp);
        venue.attach_random_walk(symbol, walk, WARMUP_BARS);
    }
    info!(
        "Paper venue ready: {} {} equity, {} symbols, one bar every {} ms",
        paper.equity,
        paper.currency,
        settings.symbols.len(),
        paper.bar_interval_ms
    );
    venue
}

/// Builds the four stages selected in the settings.
pub fn build_pipeline(settings: &Settings) -> Result<Pipeline, ConfigError> {
    Ok(Pipeline {
        strategist: strategy_lab::build_strategist(&settings.signal, settings.timeframe)?,
        sizer: Box::new(PositionSizer::from_props(&settings.sizing)),
        assessor: Box::new(RiskManager::from_props(&settings.risk)),
        executor: Box::new(OrderExecutor::default()),
    })
}

/// Opens a session on `venue` and returns a director ready to `run()`.
pub fn wire(settings: &Settings, venue: &PaperVenue) -> anyhow::Result<TradingDirector> {
    let pipeline = build_pipeline(settings).context("invalid strategy parameters")?;

    let session = Session::open(
        Collaborators {
            feed: Box::new(venue.clone()),
            account: Box::new(venue.clone()),
            catalog: Box::new(venue.clone()),
            broker: Box::new(venue.clone()),
            notifier: Box::new(venue.clone()),
            connector: Box::new(venue.clone()),
        },
        settings.magic_number,
        settings.currency_converter(),
        settings.allow_live_account,
    )
    .context("failed to open the trading session")?;

    if session.check_symbols(&settings.symbols) < settings.symbols.len() {
        warn!("Some configured symbols are unknown to the venue and will never produce bars");
    }

    Ok(TradingDirector::new(
        session,
        pipeline,
        settings.symbols.clone(),
        settings.timeframe,
    )
    .with_poll_interval(settings.poll_interval())
    .with_notifications(settings.notifications.enabled))
}
