//! RSI mean reversion.
//!
//! Buys when the RSI drops below the lower threshold and sells when it rises
//! above the upper one, with optional stop-loss/take-profit levels measured
//! from the current quote.

use super::{enter, mean, StopPoints};
use log::{debug, warn};
use trading::prelude::*;
use trading::Timeframe;
use trading_core::properties::RsiProps;
use trading_core::{ConfigError, Executor, Session, Strategist};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

pub struct RsiMeanReversion {
    timeframe: Timeframe,
    period: usize,
    upper: Decimal,
    lower: Decimal,
    points: StopPoints,
}

impl RsiMeanReversion {
    pub fn new(props: &RsiProps, timeframe: Timeframe) -> Result<Self, ConfigError> {
        let period = props.period.max(2);
        let upper = threshold(props.upper, Decimal::from(70), "upper");
        let lower = threshold(props.lower, Decimal::from(30), "lower");
        if lower >= upper {
            return Err(ConfigError::invalid(
                "rsi",
                format!("upper level {upper} must be greater than lower level {lower}"),
            ));
        }
        Ok(Self {
            timeframe,
            period,
            upper,
            lower,
            points: StopPoints::new(props.sl_points, props.tp_points),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn thresholds(&self) -> (Decimal, Decimal) {
        (self.lower, self.upper)
    }
}

fn threshold(value: Decimal, fallback: Decimal, which: &str) -> Decimal {
    if value < Decimal::ZERO || value > HUNDRED {
        warn!("RSI {} level {} outside [0, 100], using {}", which, value, fallback);
        fallback
    } else {
        value
    }
}

/// Relative strength index over the last `period` close-to-close changes.
///
/// Gains and losses are averaged with a plain mean. When there is no loss
/// in the window the RSI is 100.
///
/// # Returns
///
/// * `None` - fewer than two closes.
pub fn compute_rsi(closes: &[Decimal], period: usize) -> Option<Decimal> {
    if closes.len() < 2 {
        return None;
    }
    let deltas: Vec<Decimal> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let window = &deltas[deltas.len().saturating_sub(period)..];

    let gains: Vec<Decimal> = window.iter().map(|d| (*d).max(Decimal::ZERO)).collect();
    let losses: Vec<Decimal> = window.iter().map(|d| (-*d).max(Decimal::ZERO)).collect();
    let avg_gain = mean(&gains);
    let avg_loss = mean(&losses);

    if avg_loss.is_zero() {
        return Some(HUNDRED);
    }
    let rs = avg_gain / avg_loss;
    Some(HUNDRED - HUNDRED / (Decimal::ONE + rs))
}

impl Strategist for RsiMeanReversion {
    fn name(&self) -> &str {
        "rsi"
    }

    fn generate_signal(
        &self,
        event: &DataEvent,
        session: &Session,
        executor: &dyn Executor,
    ) -> Result<Option<SignalEvent>, TradingError> {
        let symbol = event.symbol.as_str();
        let closes: Vec<Decimal> = session
            .feed()
            .latest_closed_bars(symbol, self.timeframe, self.period + 1)
            .iter()
            .map(|b| b.close)
            .collect();
        if closes.len() < self.period + 1 {
            return Err(TradingError::unavailable(symbol, "bar history"));
        }

        let rsi = compute_rsi(&closes, self.period)
            .ok_or_else(|| TradingError::unavailable(symbol, "bar history"))?;
        debug!("{} RSI({}) = {}", symbol, self.period, rsi.round_dp(2));

        let counts = session
            .account()
            .position_counts(symbol, session.magic_number())?;
        enter(
            session,
            executor,
            symbol,
            counts,
            rsi < self.lower,
            rsi > self.upper,
            self.points,
        )
    }
}
