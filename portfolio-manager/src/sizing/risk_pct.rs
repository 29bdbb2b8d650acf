use super::{round_to_step, SizingMethod};
use log::{debug, warn};
use rust_decimal::Decimal;
use trading::{Direction, SignalEvent, TradingError};
use trading_core::Session;

/// Sizes so that hitting the stop loss costs `risk_pct` of equity.
///
/// ```text
/// ticks      = trunc(|entry - stop_loss| / tick_size)
/// tick_value = contract_size * tick_size, in account currency
/// volume     = equity * risk_pct / (ticks * tick_value)
/// ```
///
/// The volume is then rounded to the nearest volume step.
pub struct RiskPct {
    pub risk_pct: Decimal,
}

impl RiskPct {
    fn entry_price(signal: &SignalEvent, session: &Session) -> Result<Decimal, TradingError> {
        if signal.target_order.is_pending() {
            return Ok(signal.target_price);
        }
        let tick = session
            .feed()
            .latest_tick(&signal.symbol)
            .ok_or_else(|| TradingError::unavailable(&signal.symbol, "tick"))?;
        Ok(match signal.direction {
            Direction::Buy => tick.ask,
            Direction::Sell => tick.bid,
        })
    }
}

impl SizingMethod for RiskPct {
    fn name(&self) -> &str {
        "risk_pct"
    }

    fn volume(&self, signal: &SignalEvent, session: &Session) -> Result<Decimal, TradingError> {
        let symbol = signal.symbol.as_str();
        if self.risk_pct <= Decimal::ZERO {
            warn!("Risk percentage {} must be greater than 0", self.risk_pct);
            return Ok(Decimal::ZERO);
        }
        if signal.stop_loss <= Decimal::ZERO {
            warn!("{}: risk sizing needs a stop loss, got {}", symbol, signal.stop_loss);
            return Ok(Decimal::ZERO);
        }

        let info = session
            .catalog()
            .symbol_info(symbol)
            .ok_or_else(|| TradingError::unavailable(symbol, "symbol info"))?;
        let entry = Self::entry_price(signal, session)?;
        let equity = session.account().equity()?;
        let account_ccy = session.account().currency()?;

        let tick_size = info.get_tick_size();
        let Some(ticks) = ((entry - signal.stop_loss).abs()).checked_div(tick_size) else {
            warn!("{}: tick size is zero, cannot size", symbol);
            return Ok(Decimal::ZERO);
        };
        let ticks = ticks.trunc();

        let tick_value_quote = info.get_contract_size() * tick_size;
        let tick_value = match session.convert(tick_value_quote, info.get_quote_currency(), &account_ccy) {
            Ok(v) => v,
            Err(e) => {
                warn!("{}: {}, cannot size", symbol, e);
                return Ok(Decimal::ZERO);
            }
        };

        let monetary_risk = equity * self.risk_pct;
        let Some(raw) = monetary_risk.checked_div(ticks * tick_value) else {
            warn!(
                "{}: stop distance of {} ticks (tick value {}) leaves nothing to size",
                symbol, ticks, tick_value
            );
            return Ok(Decimal::ZERO);
        };

        let Some(volume) = round_to_step(raw, info.get_volume_step()) else {
            warn!("{}: volume step is zero, cannot size", symbol);
            return Ok(Decimal::ZERO);
        };
        debug!(
            "{}: risk {} {} over {} ticks @ {} -> {} lots (raw {})",
            symbol, monetary_risk, account_ccy, ticks, tick_value, volume, raw
        );
        Ok(volume)
    }
}
