use log::{error, info, warn};
use trading::{
    Direction, Event, ExecutionEvent, MarketOrderRequest, OrderEvent, OrderType,
    PendingOrderRequest, PendingPlacedEvent, TradingError,
};
use trading_core::{Executor, Session};
use uuid::Uuid;

/// Routes approved orders to the broker and manages the strategy's own
/// positions and resting orders.
///
/// Every position or order it touches is selected by symbol and the
/// session's magic number, so manual trades and other strategies on the
/// same account are left alone.
pub struct OrderExecutor {
    comment: String,
}

impl Default for OrderExecutor {
    fn default() -> Self {
        Self::new("trader")
    }
}

impl OrderExecutor {
    /// # Arguments
    ///
    /// * `comment` - Prefix of the comment attached to every order.
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
        }
    }

    fn order_comment(&self) -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("{}-{}", self.comment, &id[..8])
    }

    fn send_market(&self, order: &OrderEvent, session: &Session) -> Result<Option<Event>, TradingError> {
        let signal = &order.signal;
        let request = MarketOrderRequest {
            symbol: signal.symbol.clone(),
            direction: signal.direction,
            volume: order.volume,
            stop_loss: signal.stop_loss,
            take_profit: signal.take_profit,
            magic_number: signal.magic_number,
            comment: self.order_comment(),
        };

        let fill = session.broker().submit_market_order(&request).map_err(|rejection| {
            error!(
                "Market {} order for {} {} failed: {}",
                signal.direction, request.volume, signal.symbol, rejection
            );
            TradingError::from(rejection)
        })?;

        if !fill.status.is_done() {
            warn!(
                "Market order {} for {} returned status {:?}, no execution recorded",
                fill.ticket, signal.symbol, fill.status
            );
            return Ok(None);
        }

        info!(
            "Market {} order for {} {} filled @ {} (ticket {}, {})",
            signal.direction, fill.volume, signal.symbol, fill.price, fill.ticket, request.comment
        );
        Ok(Some(Event::Execution(ExecutionEvent {
            symbol: signal.symbol.clone(),
            direction: signal.direction,
            fill_price: fill.price,
            fill_time: fill.time,
            volume: fill.volume,
            ticket: fill.ticket,
            magic_number: signal.magic_number,
        })))
    }

    fn send_pending(&self, order: &OrderEvent, session: &Session) -> Result<Option<Event>, TradingError> {
        let signal = &order.signal;
        let request = PendingOrderRequest {
            symbol: signal.symbol.clone(),
            direction: signal.direction,
            order_type: signal.target_order,
            target_price: signal.target_price,
            volume: order.volume,
            stop_loss: signal.stop_loss,
            take_profit: signal.take_profit,
            magic_number: signal.magic_number,
            comment: self.order_comment(),
        };

        let ack = session.broker().submit_pending_order(&request).map_err(|rejection| {
            error!(
                "{} {} order for {} {} @ {} failed: {}",
                signal.target_order,
                signal.direction,
                request.volume,
                signal.symbol,
                signal.target_price,
                rejection
            );
            TradingError::from(rejection)
        })?;

        info!(
            "{} {} order for {} {} placed @ {} (ticket {})",
            signal.target_order, signal.direction, order.volume, signal.symbol, signal.target_price, ack.ticket
        );
        Ok(Some(Event::PendingPlaced(PendingPlacedEvent {
            symbol: signal.symbol.clone(),
            direction: signal.direction,
            target_order: signal.target_order,
            target_price: signal.target_price,
            volume: order.volume,
            ticket: ack.ticket,
            magic_number: signal.magic_number,
        })))
    }
}

impl Executor for OrderExecutor {
    fn execute_order(&self, order: &OrderEvent, session: &Session) -> Result<Option<Event>, TradingError> {
        match order.signal.target_order {
            OrderType::Market => self.send_market(order, session),
            OrderType::Limit | OrderType::Stop => self.send_pending(order, session),
        }
    }

    fn close_strategy_positions(
        &self,
        session: &Session,
        symbol: &str,
        side: Direction,
    ) -> Result<usize, TradingError> {
        let positions = session
            .account()
            .open_positions_for_strategy(session.magic_number())?;

        let mut closed = 0;
        for position in positions
            .iter()
            .filter(|p| p.symbol == symbol && p.direction == side)
        {
            let fill = session.broker().close_position(position.ticket).map_err(|rejection| {
                error!("Closing position {} on {} failed: {}", position.ticket, symbol, rejection);
                TradingError::from(rejection)
            })?;
            info!(
                "Closed {} position {} on {} ({} @ {})",
                side, position.ticket, symbol, fill.volume, fill.price
            );
            closed += 1;
        }
        Ok(closed)
    }

    fn cancel_strategy_pending_orders(
        &self,
        session: &Session,
        symbol: &str,
        side: Direction,
    ) -> Result<usize, TradingError> {
        let orders = session
            .account()
            .pending_orders_for_strategy(session.magic_number())?;

        let mut cancelled = 0;
        for order in orders
            .iter()
            .filter(|o| o.symbol == symbol && o.direction == side)
        {
            session.broker().cancel_pending(order.ticket).map_err(|rejection| {
                error!("Cancelling order {} on {} failed: {}", order.ticket, symbol, rejection);
                TradingError::from(rejection)
            })?;
            info!(
                "Cancelled {} {} order {} on {}",
                order.order_type, side, order.ticket, symbol
            );
            cancelled += 1;
        }
        Ok(cancelled)
    }
}
