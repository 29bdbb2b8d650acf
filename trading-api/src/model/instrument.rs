//! Static contract specification of a tradable symbol.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Venue symbol name (e.g. "EURUSD").
    symbol: String,

    /// Smallest volume the venue accepts for one order.
    min_volume: Decimal,

    /// Granularity every order volume must be a multiple of.
    volume_step: Decimal,

    /// Smallest price increment.
    tick_size: Decimal,

    /// Units of the base asset in one lot.
    contract_size: Decimal,

    /// Currency prices are quoted in (profit currency).
    quote_currency: String,

    /// Point size used to express stop distances.
    point: Decimal,
}

impl SymbolInfo {
    /// Creates a spec with forex-like defaults: 0.01 lots min/step,
    /// 100 000 units per lot, five-decimal pricing.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Venue symbol name.
    /// * `quote_currency` - Currency the symbol is priced in.
    pub fn new(symbol: impl Into<String>, quote_currency: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            min_volume: Decimal::new(1, 2),
            volume_step: Decimal::new(1, 2),
            tick_size: Decimal::new(1, 5),
            contract_size: Decimal::new(100_000, 0),
            quote_currency: quote_currency.into(),
            point: Decimal::new(1, 5),
        }
    }

    pub fn with_volume_limits(mut self, min_volume: Decimal, volume_step: Decimal) -> Self {
        self.min_volume = min_volume;
        self.volume_step = volume_step;
        self
    }

    /// Sets both the tick size and the point size.
    pub fn with_tick(mut self, tick_size: Decimal, point: Decimal) -> Self {
        self.tick_size = tick_size;
        self.point = point;
        self
    }

    pub fn with_contract_size(mut self, contract_size: Decimal) -> Self {
        self.contract_size = contract_size;
        self
    }

    pub fn get_symbol(&self) -> &str {
        &self.symbol
    }

    pub fn get_min_volume(&self) -> Decimal {
        self.min_volume
    }

    pub fn get_volume_step(&self) -> Decimal {
        self.volume_step
    }

    pub fn get_tick_size(&self) -> Decimal {
        self.tick_size
    }

    pub fn get_contract_size(&self) -> Decimal {
        self.contract_size
    }

    pub fn get_quote_currency(&self) -> &str {
        &self.quote_currency
    }

    pub fn get_point(&self) -> Decimal {
        self.point
    }
}
