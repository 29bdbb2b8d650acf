//! Account-side snapshots: open positions, resting orders, exposure counts.

use crate::model::identity::{MagicNumber, Ticket};
use crate::model::order::{Direction, OrderType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An open position as reported by the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticket: Ticket,
    pub symbol: String,
    pub direction: Direction,
    pub volume: Decimal,
    pub open_price: Decimal,
    pub open_time: DateTime<Utc>,
    /// `0` for positions opened by hand.
    pub magic_number: MagicNumber,
}

/// A pending order resting on the venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub ticket: Ticket,
    pub symbol: String,
    pub direction: Direction,
    pub order_type: OrderType,
    pub target_price: Decimal,
    pub volume: Decimal,
    pub magic_number: MagicNumber,
}

/// Number of open positions per side for one symbol and magic number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCounts {
    pub long: usize,
    pub short: usize,
}

impl PositionCounts {
    pub fn new(long: usize, short: usize) -> Self {
        Self { long, short }
    }

    pub fn on_side(&self, direction: Direction) -> usize {
        match direction {
            Direction::Buy => self.long,
            Direction::Sell => self.short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountMode {
    Demo,
    Contest,
    Real,
}

/// What the terminal reports once a session is established.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub login: u64,
    pub holder: String,
    pub server: String,
    pub mode: AccountMode,
    pub currency: String,
    pub balance: Decimal,
    pub equity: Decimal,
    pub leverage: u32,
    /// Whether automated trading is enabled on the terminal side.
    pub trade_allowed: bool,
}
