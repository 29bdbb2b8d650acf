use crate::error::TradingError;
use crate::model::identity::MagicNumber;
use crate::model::portfolio::{PendingOrder, Position, PositionCounts};
use rust_decimal::Decimal;

/// Read-only view of the trading account.
pub trait Account: Send {
    /// Open positions tagged with `magic`, across all symbols.
    fn open_positions_for_strategy(&self, magic: MagicNumber) -> Result<Vec<Position>, TradingError>;

    /// Long/short position counts for one symbol, restricted to `magic`.
    fn position_counts(&self, symbol: &str, magic: MagicNumber) -> Result<PositionCounts, TradingError>;

    /// Resting pending orders tagged with `magic`, across all symbols.
    fn pending_orders_for_strategy(&self, magic: MagicNumber) -> Result<Vec<PendingOrder>, TradingError>;

    /// Current equity in account currency.
    fn equity(&self) -> Result<Decimal, TradingError>;

    /// Account currency code (e.g. "EUR").
    fn currency(&self) -> Result<String, TradingError>;
}
