use crate::error::TradingError;
use crate::model::portfolio::AccountSummary;

/// Session bootstrap against the trading terminal.
pub trait Connector: Send {
    /// Establishes the connection and reports the account it landed on.
    fn connect(&self) -> Result<AccountSummary, TradingError>;

    /// Tears the connection down. Must be safe to call more than once.
    fn disconnect(&self);
}
