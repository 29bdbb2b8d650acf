use rust_decimal::Decimal;
use trading::{SignalEvent, TradingError};
use trading_core::Session;

pub mod fixed;
pub mod minimum;
pub mod risk_pct;

/// One way of turning a signal into a volume.
///
/// Methods fail closed: when they cannot size safely they return `0` and the
/// signal is dropped by the caller.
pub trait SizingMethod: Send + Sync {
    fn name(&self) -> &str;
    fn volume(&self, signal: &SignalEvent, session: &Session) -> Result<Decimal, TradingError>;
}

/// Rounds `value` to the nearest multiple of `step`, ties to even.
pub(crate) fn round_to_step(value: Decimal, step: Decimal) -> Option<Decimal> {
    value.checked_div(step).map(|steps| steps.round() * step)
}
