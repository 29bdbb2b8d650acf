use crate::model::instrument::SymbolInfo;
use rust_decimal::Decimal;

/// Lookup of static contract specifications.
///
/// Only `symbol_info` is required; the accessors are conveniences for the
/// common single-field lookups.
pub trait SymbolCatalog: Send {
    fn symbol_info(&self, symbol: &str) -> Option<SymbolInfo>;

    fn minimum_volume(&self, symbol: &str) -> Option<Decimal> {
        self.symbol_info(symbol).map(|s| s.get_min_volume())
    }

    fn volume_step(&self, symbol: &str) -> Option<Decimal> {
        self.symbol_info(symbol).map(|s| s.get_volume_step())
    }

    fn tick_size(&self, symbol: &str) -> Option<Decimal> {
        self.symbol_info(symbol).map(|s| s.get_tick_size())
    }

    fn contract_size(&self, symbol: &str) -> Option<Decimal> {
        self.symbol_info(symbol).map(|s| s.get_contract_size())
    }

    fn quote_currency(&self, symbol: &str) -> Option<String> {
        self.symbol_info(symbol)
            .map(|s| s.get_quote_currency().to_string())
    }

    fn point(&self, symbol: &str) -> Option<Decimal> {
        self.symbol_info(symbol).map(|s| s.get_point())
    }
}
