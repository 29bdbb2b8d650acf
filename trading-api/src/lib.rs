//! Shared vocabulary of the trading pipeline.
//!
//! Everything that crosses a crate boundary lives here: the closed event
//! model, the market/account data types and the collaborator traits behind
//! which the venue (terminal, broker, data vendor, chat channel) is hidden.

pub mod error;
pub mod model;
pub mod traits;

pub use error::{Rejection, TradingError};
pub use model::event::{
    DataEvent, Event, EventKind, ExecutionEvent, MalformedEvent, OrderEvent, PendingPlacedEvent,
    SignalEvent, SizingEvent,
};
pub use model::execution::{ExecutionStatus, Fill, MarketOrderRequest, PendingAck, PendingOrderRequest};
pub use model::identity::{MagicNumber, Ticket};
pub use model::instrument::SymbolInfo;
pub use model::market_data::{Bar, Tick, Timeframe, UnknownTimeframe};
pub use model::order::{Direction, OrderType};
pub use model::portfolio::{AccountMode, AccountSummary, PendingOrder, Position, PositionCounts};
pub use traits::account::Account;
pub use traits::broker::Broker;
pub use traits::connector::Connector;
pub use traits::data_feed::DataFeed;
pub use traits::notifier::Notifier;
pub use traits::symbol_catalog::SymbolCatalog;

pub mod prelude {
    pub use crate::model::event::{DataEvent, Event, OrderEvent, SignalEvent, SizingEvent};
    pub use crate::model::order::{Direction, OrderType};
    pub use crate::traits::{
        account::Account, broker::Broker, data_feed::DataFeed, symbol_catalog::SymbolCatalog,
    };
    pub use crate::TradingError;
    pub use rust_decimal::Decimal;
}
