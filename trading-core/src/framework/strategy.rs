//! The four pluggable decision stages.
//!
//! Each stage consumes one event kind and emits at most one event of the
//! next kind. Stages hold configuration only; everything they need to look
//! up goes through the `Session`.

use crate::framework::context::Session;
use log::info;
use trading::{DataEvent, Direction, Event, OrderEvent, SignalEvent, SizingEvent, TradingError};

/// Turns new bars into trade intents.
pub trait Strategist: Send {
    fn name(&self) -> &str;

    /// Called for every new closed bar.
    ///
    /// # Arguments
    ///
    /// * `event` - The bar that triggered the call.
    /// * `session` - Access to history, quotes and position counts.
    /// * `executor` - Used to flatten the opposite side before a reversal.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(SignalEvent))` - a trade intent.
    /// * `Ok(None)` - nothing to do on this bar.
    fn generate_signal(
        &self,
        event: &DataEvent,
        session: &Session,
        executor: &dyn Executor,
    ) -> Result<Option<SignalEvent>, TradingError>;
}

/// Attaches a volume to a trade intent.
pub trait Sizer: Send {
    fn name(&self) -> &str;

    /// # Returns
    ///
    /// * `Ok(None)` - the signal is dropped (zero or below-minimum volume).
    fn size_signal(
        &self,
        signal: &SignalEvent,
        session: &Session,
    ) -> Result<Option<SizingEvent>, TradingError>;
}

/// Approves or rejects a sized intent against the risk policy.
pub trait Assessor: Send {
    fn name(&self) -> &str;

    /// # Returns
    ///
    /// * `Ok(Some(OrderEvent))` - approved, with the volume to trade.
    /// * `Ok(None)` - rejected by policy.
    fn assess_order(
        &self,
        sizing: &SizingEvent,
        session: &Session,
    ) -> Result<Option<OrderEvent>, TradingError>;
}

/// Decides how an approved order reaches the venue, and owns the
/// strategy-scoped close/cancel operations.
pub trait Executor: Send {
    /// Routes an approved order to the broker.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Event::Execution))` - a market order traded.
    /// * `Ok(Some(Event::PendingPlaced))` - a limit/stop order is resting.
    fn execute_order(&self, order: &OrderEvent, session: &Session) -> Result<Option<Event>, TradingError>;

    /// Closes the session's positions on `symbol` and `side`.
    ///
    /// # Returns
    ///
    /// * `usize` - how many positions were closed.
    fn close_strategy_positions(
        &self,
        session: &Session,
        symbol: &str,
        side: Direction,
    ) -> Result<usize, TradingError>;

    /// Cancels the session's resting pending orders on `symbol` and `side`.
    fn cancel_strategy_pending_orders(
        &self,
        session: &Session,
        symbol: &str,
        side: Direction,
    ) -> Result<usize, TradingError>;

    /// Removes all exposure on `side`: resting orders first, then positions.
    fn flatten(&self, session: &Session, symbol: &str, side: Direction) -> Result<usize, TradingError> {
        let cancelled = self.cancel_strategy_pending_orders(session, symbol, side)?;
        let closed = self.close_strategy_positions(session, symbol, side)?;
        if cancelled + closed > 0 {
            info!(
                "Flattened {} {}: {} pending cancelled, {} positions closed",
                symbol, side, cancelled, closed
            );
        }
        Ok(cancelled + closed)
    }
}
