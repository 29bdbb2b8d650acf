//! Position sizing.
//!
//! `PositionSizer` wraps the configured `SizingMethod` and applies the
//! minimum-volume floor every method shares: a volume the venue would not
//! accept never reaches the risk assessor.

pub mod sizing;

use log::{info, warn};
use rust_decimal::Decimal;
use sizing::{fixed::FixedSize, minimum::MinimumVolume, risk_pct::RiskPct, SizingMethod};
use trading::{SignalEvent, SizingEvent, TradingError};
use trading_core::properties::SizingProps;
use trading_core::{Session, Sizer};

pub struct PositionSizer {
    method: Box<dyn SizingMethod>,
}

impl PositionSizer {
    pub fn new(method: Box<dyn SizingMethod>) -> Self {
        Self { method }
    }

    pub fn from_props(props: &SizingProps) -> Self {
        let method: Box<dyn SizingMethod> = match props {
            SizingProps::Fixed { volume } => Box::new(FixedSize { volume: *volume }),
            SizingProps::MinimumVolume => Box::new(MinimumVolume),
            SizingProps::RiskPct { risk_pct } => Box::new(RiskPct { risk_pct: *risk_pct }),
        };
        info!("Position sizer: {}", props.name());
        Self::new(method)
    }
}

impl Sizer for PositionSizer {
    fn name(&self) -> &str {
        self.method.name()
    }

    fn size_signal(
        &self,
        signal: &SignalEvent,
        session: &Session,
    ) -> Result<Option<SizingEvent>, TradingError> {
        let symbol = signal.symbol.as_str();
        let volume = self.method.volume(signal, session)?;
        if volume <= Decimal::ZERO {
            warn!("{}: {} sizer produced no volume, signal dropped", symbol, self.method.name());
            return Ok(None);
        }

        let minimum = session
            .catalog()
            .minimum_volume(symbol)
            .ok_or_else(|| TradingError::unavailable(symbol, "minimum volume"))?;
        if volume < minimum {
            warn!(
                "Volume {} is lower than the minimum volume {} allowed for {}, signal dropped",
                volume, minimum, symbol
            );
            return Ok(None);
        }

        Ok(Some(SizingEvent {
            signal: signal.clone(),
            volume,
        }))
    }
}
