//! Market data models.
//!
//! `Bar` is one closed OHLC candle, `Tick` the latest top-of-book quote.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A closed candle. `time` is the candle's open time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub tick_volume: u64,
    pub volume: u64,
    /// Spread in points at the candle close.
    pub spread: u32,
}

impl Bar {
    /// A flat candle where every price equals `close`.
    pub fn flat(time: DateTime<Utc>, close: Decimal) -> Self {
        Self {
            time,
            open: close,
            high: close,
            low: close,
            close,
            tick_volume: 0,
            volume: 0,
            spread: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub time: DateTime<Utc>,
    pub bid: Decimal,
    pub ask: Decimal,
}

impl Tick {
    pub fn new(time: DateTime<Utc>, bid: Decimal, ask: Decimal) -> Self {
        Self { time, bid, ask }
    }

    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }
}

/// Bar compression understood by the data feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1min")]
    M1,
    #[serde(rename = "2min")]
    M2,
    #[serde(rename = "3min")]
    M3,
    #[serde(rename = "4min")]
    M4,
    #[serde(rename = "5min")]
    M5,
    #[serde(rename = "6min")]
    M6,
    #[serde(rename = "10min")]
    M10,
    #[serde(rename = "12min")]
    M12,
    #[serde(rename = "15min")]
    M15,
    #[serde(rename = "20min")]
    M20,
    #[serde(rename = "30min")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "2h")]
    H2,
    #[serde(rename = "3h")]
    H3,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "6h")]
    H6,
    #[serde(rename = "8h")]
    H8,
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "1D")]
    D1,
    #[serde(rename = "1W")]
    W1,
    #[serde(rename = "1M")]
    MN1,
}

const TIMEFRAMES: [(Timeframe, &str); 21] = [
    (Timeframe::M1, "1min"),
    (Timeframe::M2, "2min"),
    (Timeframe::M3, "3min"),
    (Timeframe::M4, "4min"),
    (Timeframe::M5, "5min"),
    (Timeframe::M6, "6min"),
    (Timeframe::M10, "10min"),
    (Timeframe::M12, "12min"),
    (Timeframe::M15, "15min"),
    (Timeframe::M20, "20min"),
    (Timeframe::M30, "30min"),
    (Timeframe::H1, "1h"),
    (Timeframe::H2, "2h"),
    (Timeframe::H3, "3h"),
    (Timeframe::H4, "4h"),
    (Timeframe::H6, "6h"),
    (Timeframe::H8, "8h"),
    (Timeframe::H12, "12h"),
    (Timeframe::D1, "1D"),
    (Timeframe::W1, "1W"),
    (Timeframe::MN1, "1M"),
];

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        TIMEFRAMES
            .iter()
            .find(|(tf, _)| tf == self)
            .map(|(_, name)| *name)
            .unwrap_or("?")
    }

}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timeframe '{0}', expected one of 1min..30min, 1h..12h, 1D, 1W, 1M")]
pub struct UnknownTimeframe(pub String);

impl FromStr for Timeframe {
    type Err = UnknownTimeframe;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TIMEFRAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(tf, _)| *tf)
            .ok_or_else(|| UnknownTimeframe(s.to_string()))
    }
}
