use crate::model::identity::{MagicNumber, Ticket};
use crate::model::order::{Direction, OrderType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status of an order execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Order has been accepted by the system but not yet sent to broker.
    New,
    /// Order has been acknowledged by the broker.
    Pending,
    /// Order has been partially filled.
    PartiallyFilled,
    /// Order has been fully filled.
    Filled,
    /// Order has been cancelled.
    Cancelled,
    /// Order has been rejected by the broker or exchange.
    Rejected,
    /// Order has expired.
    Expired,
}

impl ExecutionStatus {
    /// Whether any volume changed hands.
    pub fn is_done(self) -> bool {
        matches!(
            self,
            ExecutionStatus::Filled | ExecutionStatus::PartiallyFilled
        )
    }
}

/// A market order as handed to the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOrderRequest {
    pub symbol: String,
    pub direction: Direction,
    pub volume: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub magic_number: MagicNumber,
    /// Free-text tag echoed back by the venue.
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrderRequest {
    pub symbol: String,
    pub direction: Direction,
    pub order_type: OrderType,
    pub target_price: Decimal,
    pub volume: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub magic_number: MagicNumber,
    pub comment: String,
}

/// Result of an order that traded (opening or closing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub ticket: Ticket,
    pub symbol: String,
    pub direction: Direction,
    pub price: Decimal,
    pub volume: Decimal,
    pub time: DateTime<Utc>,
    pub status: ExecutionStatus,
}

/// Acknowledgement of a pending order placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAck {
    pub ticket: Ticket,
}
