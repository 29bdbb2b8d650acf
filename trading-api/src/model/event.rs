//! The closed set of messages flowing through the pipeline.
//!
//! Every non-terminal event is produced by exactly one stage and consumed by
//! exactly one downstream stage:
//!
//! ```text
//! Data -> Signal -> Sizing -> Order -> Execution | PendingPlaced
//! ```

use crate::model::identity::{MagicNumber, Ticket};
use crate::model::market_data::Bar;
use crate::model::order::{Direction, OrderType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Data,
    Signal,
    Sizing,
    Order,
    Execution,
    PendingPlaced,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Data => "DATA",
            EventKind::Signal => "SIGNAL",
            EventKind::Sizing => "SIZING",
            EventKind::Order => "ORDER",
            EventKind::Execution => "EXECUTION",
            EventKind::PendingPlaced => "PENDING_PLACED",
        };
        f.write_str(name)
    }
}

/// An event whose fields break the pipeline invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed {kind} event for '{symbol}': {reason}")]
pub struct MalformedEvent {
    pub kind: EventKind,
    pub symbol: String,
    pub reason: String,
}

/// A new closed bar has been observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEvent {
    pub symbol: String,
    pub bar: Bar,
}

/// Trade intent without a size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub symbol: String,
    pub direction: Direction,
    pub target_order: OrderType,
    /// Entry price for pending orders, `0` for market orders.
    pub target_price: Decimal,
    pub magic_number: MagicNumber,
    /// `0` means not set.
    pub stop_loss: Decimal,
    /// `0` means not set.
    pub take_profit: Decimal,
}

impl SignalEvent {
    /// A market order intent with no protective levels.
    pub fn market(symbol: impl Into<String>, direction: Direction, magic_number: MagicNumber) -> Self {
        Self {
            symbol: symbol.into(),
            direction,
            target_order: OrderType::Market,
            target_price: Decimal::ZERO,
            magic_number,
            stop_loss: Decimal::ZERO,
            take_profit: Decimal::ZERO,
        }
    }

    pub fn with_stops(mut self, stop_loss: Decimal, take_profit: Decimal) -> Self {
        self.stop_loss = stop_loss;
        self.take_profit = take_profit;
        self
    }

    pub fn with_target(mut self, target_order: OrderType, target_price: Decimal) -> Self {
        self.target_order = target_order;
        self.target_price = target_price;
        self
    }
}

/// A signal with a volume attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingEvent {
    pub signal: SignalEvent,
    pub volume: Decimal,
}

/// A sized signal the risk policy approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub signal: SignalEvent,
    pub volume: Decimal,
}

impl OrderEvent {
    pub fn approve(sizing: SizingEvent, volume: Decimal) -> Self {
        Self {
            signal: sizing.signal,
            volume,
        }
    }
}

/// A market order traded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub symbol: String,
    pub direction: Direction,
    pub fill_price: Decimal,
    pub fill_time: DateTime<Utc>,
    pub volume: Decimal,
    pub ticket: Ticket,
    pub magic_number: MagicNumber,
}

/// A pending order is resting on the venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPlacedEvent {
    pub symbol: String,
    pub direction: Direction,
    pub target_order: OrderType,
    pub target_price: Decimal,
    pub volume: Decimal,
    pub ticket: Ticket,
    pub magic_number: MagicNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Data(DataEvent),
    Signal(SignalEvent),
    Sizing(SizingEvent),
    Order(OrderEvent),
    Execution(ExecutionEvent),
    PendingPlaced(PendingPlacedEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Data(_) => EventKind::Data,
            Event::Signal(_) => EventKind::Signal,
            Event::Sizing(_) => EventKind::Sizing,
            Event::Order(_) => EventKind::Order,
            Event::Execution(_) => EventKind::Execution,
            Event::PendingPlaced(_) => EventKind::PendingPlaced,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Event::Data(e) => &e.symbol,
            Event::Signal(e) => &e.symbol,
            Event::Sizing(e) => &e.signal.symbol,
            Event::Order(e) => &e.signal.symbol,
            Event::Execution(e) => &e.symbol,
            Event::PendingPlaced(e) => &e.symbol,
        }
    }

    /// Checks the field invariants every stage relies on.
    ///
    /// # Returns
    ///
    /// * `Err(MalformedEvent)` - naming the first broken invariant.
    pub fn validate(&self) -> Result<(), MalformedEvent> {
        let fail = |reason: String| {
            Err(MalformedEvent {
                kind: self.kind(),
                symbol: self.symbol().to_string(),
                reason,
            })
        };

        if self.symbol().trim().is_empty() {
            return fail("empty symbol".into());
        }

        match self {
            Event::Data(e) => {
                if e.bar.high < e.bar.low {
                    return fail(format!("bar high {} below low {}", e.bar.high, e.bar.low));
                }
            }
            Event::Signal(signal) => {
                if let Some(reason) = check_signal(signal) {
                    return fail(reason);
                }
            }
            Event::Sizing(SizingEvent { signal, volume })
            | Event::Order(OrderEvent { signal, volume }) => {
                if let Some(reason) = check_signal(signal) {
                    return fail(reason);
                }
                if *volume <= Decimal::ZERO {
                    return fail(format!("non-positive volume {volume}"));
                }
            }
            Event::Execution(e) => {
                if e.volume <= Decimal::ZERO {
                    return fail(format!("non-positive volume {}", e.volume));
                }
                if e.fill_price <= Decimal::ZERO {
                    return fail(format!("non-positive fill price {}", e.fill_price));
                }
            }
            Event::PendingPlaced(e) => {
                if !e.target_order.is_pending() {
                    return fail(format!("{} is not a pending order type", e.target_order));
                }
                if e.volume <= Decimal::ZERO {
                    return fail(format!("non-positive volume {}", e.volume));
                }
                if e.target_price <= Decimal::ZERO {
                    return fail(format!("non-positive target price {}", e.target_price));
                }
            }
        }
        Ok(())
    }
}

fn check_signal(signal: &SignalEvent) -> Option<String> {
    if signal.stop_loss < Decimal::ZERO {
        return Some(format!("negative stop loss {}", signal.stop_loss));
    }
    if signal.take_profit < Decimal::ZERO {
        return Some(format!("negative take profit {}", signal.take_profit));
    }
    if signal.target_price < Decimal::ZERO {
        return Some(format!("negative target price {}", signal.target_price));
    }
    if signal.target_order.is_pending() && signal.target_price.is_zero() {
        return Some(format!("{} order without target price", signal.target_order));
    }
    None
}

impl From<DataEvent> for Event {
    fn from(e: DataEvent) -> Self {
        Event::Data(e)
    }
}

impl From<SignalEvent> for Event {
    fn from(e: SignalEvent) -> Self {
        Event::Signal(e)
    }
}

impl From<SizingEvent> for Event {
    fn from(e: SizingEvent) -> Self {
        Event::Sizing(e)
    }
}

impl From<OrderEvent> for Event {
    fn from(e: OrderEvent) -> Self {
        Event::Order(e)
    }
}

impl From<ExecutionEvent> for Event {
    fn from(e: ExecutionEvent) -> Self {
        Event::Execution(e)
    }
}

impl From<PendingPlacedEvent> for Event {
    fn from(e: PendingPlacedEvent) -> Self {
        Event::PendingPlaced(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn buy() -> SignalEvent {
        SignalEvent::market("EURUSD", Direction::Buy, 42)
    }

    #[test]
    fn market_signal_is_valid() {
        let event = Event::from(buy().with_stops(dec!(1.09), dec!(1.12)));
        assert_eq!(event.kind(), EventKind::Signal);
        assert_eq!(event.symbol(), "EURUSD");
        assert!(event.validate().is_ok());
    }

    #[test]
    fn negative_stop_loss_is_malformed() {
        let event = Event::from(buy().with_stops(dec!(-1), Decimal::ZERO));
        let err = event.validate().unwrap_err();
        assert_eq!(err.kind, EventKind::Signal);
        assert!(err.reason.contains("stop loss"));
    }

    #[test]
    fn pending_signal_needs_target_price() {
        let limit = buy().with_target(OrderType::Limit, Decimal::ZERO);
        assert!(Event::from(limit.clone()).validate().is_err());

        let limit = limit.with_target(OrderType::Limit, dec!(1.0950));
        assert!(Event::from(limit).validate().is_ok());
    }

    #[test]
    fn sized_events_need_positive_volume() {
        let zero = SizingEvent {
            signal: buy(),
            volume: Decimal::ZERO,
        };
        assert!(Event::from(zero.clone()).validate().is_err());

        let order = OrderEvent::approve(zero, dec!(0.10));
        assert!(Event::from(order).validate().is_ok());
    }

    #[test]
    fn empty_symbol_is_malformed() {
        let event = Event::from(SignalEvent::market("", Direction::Sell, 1));
        let err = event.validate().unwrap_err();
        assert_eq!(err.reason, "empty symbol");
        assert_eq!(
            err.to_string(),
            "malformed SIGNAL event for '': empty symbol"
        );
    }

    #[test]
    fn pending_placed_rejects_market_type() {
        let placed = PendingPlacedEvent {
            symbol: "EURUSD".into(),
            direction: Direction::Buy,
            target_order: OrderType::Market,
            target_price: dec!(1.1),
            volume: dec!(0.1),
            ticket: 7,
            magic_number: 42,
        };
        assert!(Event::from(placed).validate().is_err());
    }
}
