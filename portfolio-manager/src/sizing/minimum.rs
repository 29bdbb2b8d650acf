use super::SizingMethod;
use rust_decimal::Decimal;
use trading::{SignalEvent, TradingError};
use trading_core::Session;

/// The smallest volume the venue accepts, rounded up to the volume step.
pub struct MinimumVolume;

impl SizingMethod for MinimumVolume {
    fn name(&self) -> &str {
        "minimum_volume"
    }

    fn volume(&self, signal: &SignalEvent, session: &Session) -> Result<Decimal, TradingError> {
        let info = session
            .catalog()
            .symbol_info(&signal.symbol)
            .ok_or_else(|| TradingError::unavailable(&signal.symbol, "minimum volume"))?;

        let step = info.get_volume_step();
        if step <= Decimal::ZERO {
            return Ok(info.get_min_volume());
        }
        Ok((info.get_min_volume() / step).ceil() * step)
    }
}
