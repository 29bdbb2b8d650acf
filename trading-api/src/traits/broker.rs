use crate::error::Rejection;
use crate::model::execution::{Fill, MarketOrderRequest, PendingAck, PendingOrderRequest};
use crate::model::identity::Ticket;

/// Raw order routing. No retries: a refusal is reported once and the
/// caller decides what to do with it.
pub trait Broker: Send {
    /// Sends a market order.
    ///
    /// # Returns
    ///
    /// * `Ok(Fill)` - the venue traded (fully or partially).
    /// * `Err(Rejection)` - the venue refused the order.
    fn submit_market_order(&self, request: &MarketOrderRequest) -> Result<Fill, Rejection>;

    /// Places a limit or stop order.
    fn submit_pending_order(&self, request: &PendingOrderRequest) -> Result<PendingAck, Rejection>;

    /// Closes an open position in full with an opposite market deal.
    fn close_position(&self, ticket: Ticket) -> Result<Fill, Rejection>;

    /// Removes a resting pending order.
    fn cancel_pending(&self, ticket: Ticket) -> Result<(), Rejection>;
}
