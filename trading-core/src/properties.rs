//! Tagged parameter sets.
//!
//! Each pipeline stage is selected by one of these enums; the `kind` tag in
//! the settings file picks the variant and the remaining keys are its
//! parameters:
//!
//! ```toml
//! [signal]
//! kind = "rsi"
//! period = 14
//! upper = 70.0
//! lower = 30.0
//! sl_points = 50
//! tp_points = 70
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalProps {
    MaCrossover(MaCrossoverProps),
    Rsi(RsiProps),
}

impl SignalProps {
    pub fn name(&self) -> &'static str {
        match self {
            SignalProps::MaCrossover(_) => "ma_crossover",
            SignalProps::Rsi(_) => "rsi",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaCrossoverProps {
    pub fast_period: usize,
    pub slow_period: usize,
    /// Stop-loss distance in points, `0` for none.
    #[serde(default)]
    pub sl_points: i64,
    #[serde(default)]
    pub tp_points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiProps {
    #[serde(default = "default_rsi_period", alias = "rsi_period")]
    pub period: usize,
    #[serde(default = "default_rsi_upper", alias = "rsi_upper")]
    pub upper: Decimal,
    #[serde(default = "default_rsi_lower", alias = "rsi_lower")]
    pub lower: Decimal,
    #[serde(default)]
    pub sl_points: i64,
    #[serde(default)]
    pub tp_points: i64,
}

fn default_rsi_period() -> usize {
    14
}

fn default_rsi_upper() -> Decimal {
    Decimal::from(70)
}

fn default_rsi_lower() -> Decimal {
    Decimal::from(30)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizingProps {
    /// Always the configured volume.
    Fixed { volume: Decimal },
    /// The venue's minimum volume, rounded up to the volume step.
    MinimumVolume,
    /// Risk `risk_pct` of equity (as a fraction, 0.01 = 1%) between entry and stop loss.
    RiskPct { risk_pct: Decimal },
}

impl SizingProps {
    pub fn name(&self) -> &'static str {
        match self {
            SizingProps::Fixed { .. } => "fixed",
            SizingProps::MinimumVolume => "minimum_volume",
            SizingProps::RiskPct { .. } => "risk_pct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskProps {
    /// Caps total notional exposure at `max_leverage_factor` × equity.
    MaxLeverageFactor { max_leverage_factor: Decimal },
}

impl RiskProps {
    pub fn name(&self) -> &'static str {
        match self {
            RiskProps::MaxLeverageFactor { .. } => "max_leverage_factor",
        }
    }
}
