pub mod ma_crossover;
pub mod rsi;

use log::{debug, info};
use rust_decimal::Decimal;
use trading::{Direction, PositionCounts, SignalEvent, TradingError};
use trading_core::{Executor, Session};

/// Protective distances in points. Non-positive means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopPoints {
    pub sl: i64,
    pub tp: i64,
}

impl StopPoints {
    pub fn new(sl: i64, tp: i64) -> Self {
        Self { sl: sl.max(0), tp: tp.max(0) }
    }

    pub fn is_unset(&self) -> bool {
        self.sl == 0 && self.tp == 0
    }
}

/// Stop-loss and take-profit prices for an entry on `direction` at the
/// current quote: buys are measured from the ask, sells from the bid.
///
/// # Returns
///
/// * `(stop_loss, take_profit)` - each `0` when its distance is unset or the
///   level would fall below zero.
pub fn stop_levels(
    session: &Session,
    symbol: &str,
    direction: Direction,
    points: StopPoints,
) -> Result<(Decimal, Decimal), TradingError> {
    if points.is_unset() {
        return Ok((Decimal::ZERO, Decimal::ZERO));
    }

    let tick = session
        .feed()
        .latest_tick(symbol)
        .ok_or_else(|| TradingError::unavailable(symbol, "tick"))?;
    let point = session
        .catalog()
        .point(symbol)
        .ok_or_else(|| TradingError::unavailable(symbol, "symbol info"))?;

    let sl_distance = point * Decimal::from(points.sl);
    let tp_distance = point * Decimal::from(points.tp);
    let (sl, tp) = match direction {
        Direction::Buy => (tick.ask - sl_distance, tick.ask + tp_distance),
        Direction::Sell => (tick.bid + sl_distance, tick.bid - tp_distance),
    };

    let level = |price: Decimal, distance: i64| {
        if distance > 0 {
            price.max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    };
    Ok((level(sl, points.sl), level(tp, points.tp)))
}

/// Picks the entry side, flattens the opposite side and builds the signal.
///
/// A buy is considered first: it needs no long open and `buy` true. A sell
/// needs no short open and `sell` true.
pub fn enter(
    session: &Session,
    executor: &dyn Executor,
    symbol: &str,
    counts: PositionCounts,
    buy: bool,
    sell: bool,
    points: StopPoints,
) -> Result<Option<SignalEvent>, TradingError> {
    let direction = if counts.long == 0 && buy {
        Direction::Buy
    } else if counts.short == 0 && sell {
        Direction::Sell
    } else {
        debug!("{}: no entry (long {}, short {})", symbol, counts.long, counts.short);
        return Ok(None);
    };

    let (stop_loss, take_profit) = stop_levels(session, symbol, direction, points)?;

    let opposite = direction.opposite();
    if counts.on_side(opposite) > 0 {
        info!(
            "{} {} signal with {} {} position(s) open, closing them first",
            symbol,
            direction,
            counts.on_side(opposite),
            opposite
        );
    }
    executor.flatten(session, symbol, opposite)?;

    Ok(Some(
        SignalEvent::market(symbol, direction, session.magic_number())
            .with_stops(stop_loss, take_profit),
    ))
}

/// Arithmetic mean; zero for an empty slice.
pub(crate) fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len())
}
