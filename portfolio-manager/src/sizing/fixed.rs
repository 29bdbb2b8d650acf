use super::SizingMethod;
use rust_decimal::Decimal;
use trading::{SignalEvent, TradingError};
use trading_core::Session;

/// Always the same volume.
pub struct FixedSize {
    pub volume: Decimal,
}

impl SizingMethod for FixedSize {
    fn name(&self) -> &str {
        "fixed"
    }

    fn volume(&self, _signal: &SignalEvent, _session: &Session) -> Result<Decimal, TradingError> {
        Ok(self.volume.max(Decimal::ZERO))
    }
}
