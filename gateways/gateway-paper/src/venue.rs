//! An in-memory venue.
//!
//! `PaperVenue` plays terminal, broker, data vendor and notification channel
//! at once. Clones share the same state, so one handle can be given to each
//! collaborator slot of a session while the caller keeps another to script
//! prices and inspect what happened.
//!
//! Bar history is a rolling window of `MAX_BARS` per symbol; the journal and
//! the notification log keep the most recent `MAX_RECORDS` entries.

use crate::feed::RandomWalk;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use trading::{
    Account, AccountMode, AccountSummary, Bar, Broker, Connector, DataFeed, Direction,
    ExecutionStatus, Fill, MagicNumber, MarketOrderRequest, Notifier, OrderType, PendingAck,
    PendingOrder, PendingOrderRequest, Position, PositionCounts, Rejection, SymbolCatalog,
    SymbolInfo, Tick, Ticket, Timeframe, TradingError,
};

/// Closed bars kept per symbol. Must cover the deepest history request.
pub const MAX_BARS: usize = 5000;

/// Journal and notification entries kept before the oldest are dropped.
pub const MAX_RECORDS: usize = 1000;

/// Drops the oldest entries so at most `cap` remain.
fn keep_last<T>(records: &mut Vec<T>, cap: usize) {
    if records.len() > cap {
        let excess = records.len() - cap;
        records.drain(..excess);
    }
}

/// Everything the venue was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum VenueAction {
    MarketOrder {
        ticket: Ticket,
        symbol: String,
        direction: Direction,
        volume: Decimal,
        magic_number: MagicNumber,
    },
    PendingOrder {
        ticket: Ticket,
        symbol: String,
        direction: Direction,
        order_type: OrderType,
        target_price: Decimal,
        volume: Decimal,
    },
    ClosePosition {
        ticket: Ticket,
    },
    CancelPending {
        ticket: Ticket,
    },
    /// A pending order's price was reached and it became a position.
    Triggered {
        ticket: Ticket,
    },
    Rejected {
        reason: String,
    },
}

struct WalkState {
    walk: RandomWalk,
    next_close: DateTime<Utc>,
}

struct VenueState {
    summary: AccountSummary,
    connected: bool,
    symbols: HashMap<String, SymbolInfo>,
    bars: HashMap<String, Vec<Bar>>,
    ticks: HashMap<String, Tick>,
    walks: HashMap<String, WalkState>,
    spread_points: i64,
    positions: Vec<Position>,
    pending: Vec<PendingOrder>,
    next_ticket: Ticket,
    reject_next: Option<Rejection>,
    journal: Vec<VenueAction>,
    notifications: Vec<(String, String)>,
}

impl VenueState {
    fn log_action(&mut self, action: VenueAction) {
        self.journal.push(action);
        keep_last(&mut self.journal, MAX_RECORDS);
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// Price at which `direction` trades right now.
    fn quote(&self, symbol: &str, direction: Direction) -> Option<(Decimal, DateTime<Utc>)> {
        self.ticks.get(symbol).map(|t| match direction {
            Direction::Buy => (t.ask, t.time),
            Direction::Sell => (t.bid, t.time),
        })
    }

    fn check_volume(&self, symbol: &str, volume: Decimal) -> Result<(), Rejection> {
        let Some(info) = self.symbols.get(symbol) else {
            return Err(Rejection::new(format!("unknown symbol {symbol}")).with_code(10013));
        };
        if volume < info.get_min_volume() {
            return Err(Rejection::new(format!(
                "volume {} below minimum {}",
                volume,
                info.get_min_volume()
            ))
            .with_code(10014));
        }
        Ok(())
    }

    fn take_scripted_rejection(&mut self) -> Result<(), Rejection> {
        match self.reject_next.take() {
            Some(rejection) => {
                self.log_action(VenueAction::Rejected {
                    reason: rejection.reason.clone(),
                });
                Err(rejection)
            }
            None => Ok(()),
        }
    }

    fn set_tick(&mut self, symbol: &str, tick: Tick) {
        self.ticks.insert(symbol.to_string(), tick);
        self.trigger_pending(symbol);
    }

    fn record_bar(&mut self, symbol: &str, bar: Bar) {
        let point = self
            .symbols
            .get(symbol)
            .map(|s| s.get_point())
            .unwrap_or_default();
        let half_spread = point * Decimal::from(self.spread_points) / Decimal::TWO;
        let tick = Tick::new(bar.time, bar.close - half_spread, bar.close + half_spread);
        let bars = self.bars.entry(symbol.to_string()).or_default();
        bars.push(bar);
        keep_last(bars, MAX_BARS);
        self.set_tick(symbol, tick);
    }

    /// Emits every random-walk bar that has closed by `now`.
    fn advance(&mut self, now: DateTime<Utc>) {
        let mut produced = Vec::new();
        for (symbol, state) in self.walks.iter_mut() {
            while state.next_close <= now {
                let open_time = state.next_close - state.walk.interval();
                produced.push((symbol.clone(), state.walk.next_bar(open_time)));
                state.next_close += state.walk.interval();
            }
        }
        for (symbol, bar) in produced {
            debug!("{} new bar {} close {}", symbol, bar.time, bar.close);
            self.record_bar(&symbol, bar);
        }
    }

    fn trigger_pending(&mut self, symbol: &str) {
        let Some(tick) = self.ticks.get(symbol).copied() else {
            return;
        };
        let (hit, resting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|o| o.symbol == symbol && reached(o, &tick));
        self.pending = resting;

        for order in hit {
            info!("Pending {} {} {} @ {} triggered", order.ticket, order.direction, order.symbol, order.target_price);
            self.log_action(VenueAction::Triggered { ticket: order.ticket });
            self.positions.push(Position {
                ticket: order.ticket,
                symbol: order.symbol,
                direction: order.direction,
                volume: order.volume,
                open_price: order.target_price,
                open_time: tick.time,
                magic_number: order.magic_number,
            });
        }
    }
}

fn reached(order: &PendingOrder, tick: &Tick) -> bool {
    match (order.direction, order.order_type) {
        (Direction::Buy, OrderType::Limit) => tick.ask <= order.target_price,
        (Direction::Buy, OrderType::Stop) => tick.ask >= order.target_price,
        (Direction::Sell, OrderType::Limit) => tick.bid >= order.target_price,
        (Direction::Sell, OrderType::Stop) => tick.bid <= order.target_price,
        (_, OrderType::Market) => true,
    }
}

/// Shared-state paper venue. See the module docs.
#[derive(Clone)]
pub struct PaperVenue {
    inner: Arc<Mutex<VenueState>>,
}

impl PaperVenue {
    /// A connected-on-demand demo account holding `equity` in `currency`.
    pub fn new(currency: impl Into<String>, equity: Decimal) -> Self {
        let summary = AccountSummary {
            login: 1,
            holder: "Paper Trader".to_string(),
            server: "paper".to_string(),
            mode: AccountMode::Demo,
            currency: currency.into(),
            balance: equity,
            equity,
            leverage: 100,
            trade_allowed: true,
        };
        Self {
            inner: Arc::new(Mutex::new(VenueState {
                summary,
                connected: false,
                symbols: HashMap::new(),
                bars: HashMap::new(),
                ticks: HashMap::new(),
                walks: HashMap::new(),
                spread_points: 10,
                positions: Vec::new(),
                pending: Vec::new(),
                next_ticket: 1000,
                reject_next: None,
                journal: Vec::new(),
                notifications: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, VenueState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_symbol(self, info: SymbolInfo) -> Self {
        self.state()
            .symbols
            .insert(info.get_symbol().to_string(), info);
        self
    }

    pub fn with_mode(self, mode: AccountMode) -> Self {
        self.state().summary.mode = mode;
        self
    }

    pub fn with_trade_allowed(self, allowed: bool) -> Self {
        self.state().summary.trade_allowed = allowed;
        self
    }

    /// Spread, in points, applied to ticks derived from bars.
    pub fn with_spread_points(self, points: i64) -> Self {
        self.state().spread_points = points.max(0);
        self
    }

    /// Drives `symbol` from a random walk, back-filling `warmup` bars that
    /// closed by now so strategies have history from the first poll.
    pub fn attach_random_walk(&self, symbol: &str, mut walk: RandomWalk, warmup: usize) {
        let now = Utc::now();
        let interval = walk.interval();
        let start = now - interval * i32::try_from(warmup).unwrap_or(i32::MAX);
        let mut state = self.state();
        for i in 0..warmup {
            let open_time = start + interval * i32::try_from(i).unwrap_or(i32::MAX);
            let bar = walk.next_bar(open_time);
            state.record_bar(symbol, bar);
        }
        state.walks.insert(
            symbol.to_string(),
            WalkState {
                walk,
                next_close: now + interval,
            },
        );
    }

    /// Appends a closed bar and moves the quote to its close.
    pub fn push_bar(&self, symbol: &str, bar: Bar) {
        self.state().record_bar(symbol, bar);
    }

    /// Appends one flat bar per close, one minute apart starting at `start`.
    pub fn push_closes(&self, symbol: &str, start: DateTime<Utc>, closes: &[Decimal]) {
        let mut state = self.state();
        for (i, close) in closes.iter().enumerate() {
            let time = start + Duration::minutes(i as i64);
            state.record_bar(symbol, Bar::flat(time, *close));
        }
    }

    pub fn set_tick(&self, symbol: &str, tick: Tick) {
        self.state().set_tick(symbol, tick);
    }

    pub fn set_equity(&self, equity: Decimal) {
        self.state().summary.equity = equity;
    }

    /// Makes the next order-routing call fail with `reason`.
    pub fn reject_next_order(&self, reason: impl Into<String>) {
        self.state().reject_next = Some(Rejection::new(reason).with_code(10006));
    }

    /// Opens a position directly, bypassing order routing (e.g. a manual trade).
    pub fn open_position(
        &self,
        symbol: &str,
        direction: Direction,
        volume: Decimal,
        magic_number: MagicNumber,
    ) -> Ticket {
        let mut state = self.state();
        let (price, time) = state
            .quote(symbol, direction)
            .unwrap_or((Decimal::ZERO, Utc::now()));
        let ticket = state.issue_ticket();
        state.positions.push(Position {
            ticket,
            symbol: symbol.to_string(),
            direction,
            volume,
            open_price: price,
            open_time: time,
            magic_number,
        });
        ticket
    }

    pub fn positions(&self) -> Vec<Position> {
        self.state().positions.clone()
    }

    pub fn pending_orders(&self) -> Vec<PendingOrder> {
        self.state().pending.clone()
    }

    pub fn journal(&self) -> Vec<VenueAction> {
        self.state().journal.clone()
    }

    pub fn notifications(&self) -> Vec<(String, String)> {
        self.state().notifications.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state().connected
    }
}

impl Connector for PaperVenue {
    fn connect(&self) -> Result<AccountSummary, TradingError> {
        let mut state = self.state();
        state.connected = true;
        Ok(state.summary.clone())
    }

    fn disconnect(&self) {
        let mut state = self.state();
        if state.connected {
            info!("Paper venue disconnected");
        }
        state.connected = false;
    }
}

impl DataFeed for PaperVenue {
    fn latest_closed_bar(&self, symbol: &str, _timeframe: Timeframe) -> Option<Bar> {
        let mut state = self.state();
        state.advance(Utc::now());
        state.bars.get(symbol).and_then(|bars| bars.last().cloned())
    }

    fn latest_closed_bars(&self, symbol: &str, _timeframe: Timeframe, count: usize) -> Vec<Bar> {
        let mut state = self.state();
        state.advance(Utc::now());
        state
            .bars
            .get(symbol)
            .map(|bars| bars[bars.len().saturating_sub(count)..].to_vec())
            .unwrap_or_default()
    }

    fn latest_tick(&self, symbol: &str) -> Option<Tick> {
        self.state().ticks.get(symbol).copied()
    }
}

impl Account for PaperVenue {
    fn open_positions_for_strategy(&self, magic: MagicNumber) -> Result<Vec<Position>, TradingError> {
        Ok(self
            .state()
            .positions
            .iter()
            .filter(|p| p.magic_number == magic)
            .cloned()
            .collect())
    }

    fn position_counts(&self, symbol: &str, magic: MagicNumber) -> Result<PositionCounts, TradingError> {
        let state = self.state();
        let mut counts = PositionCounts::default();
        for p in state
            .positions
            .iter()
            .filter(|p| p.symbol == symbol && p.magic_number == magic)
        {
            match p.direction {
                Direction::Buy => counts.long += 1,
                Direction::Sell => counts.short += 1,
            }
        }
        Ok(counts)
    }

    fn pending_orders_for_strategy(&self, magic: MagicNumber) -> Result<Vec<PendingOrder>, TradingError> {
        Ok(self
            .state()
            .pending
            .iter()
            .filter(|o| o.magic_number == magic)
            .cloned()
            .collect())
    }

    fn equity(&self) -> Result<Decimal, TradingError> {
        Ok(self.state().summary.equity)
    }

    fn currency(&self) -> Result<String, TradingError> {
        Ok(self.state().summary.currency.clone())
    }
}

impl SymbolCatalog for PaperVenue {
    fn symbol_info(&self, symbol: &str) -> Option<SymbolInfo> {
        self.state().symbols.get(symbol).cloned()
    }
}

impl Broker for PaperVenue {
    fn submit_market_order(&self, request: &MarketOrderRequest) -> Result<Fill, Rejection> {
        let mut state = self.state();
        state.take_scripted_rejection()?;
        state.check_volume(&request.symbol, request.volume)?;
        let Some((price, time)) = state.quote(&request.symbol, request.direction) else {
            return Err(Rejection::new(format!("no quote for {}", request.symbol)).with_code(10021));
        };

        let ticket = state.issue_ticket();
        state.positions.push(Position {
            ticket,
            symbol: request.symbol.clone(),
            direction: request.direction,
            volume: request.volume,
            open_price: price,
            open_time: time,
            magic_number: request.magic_number,
        });
        state.log_action(VenueAction::MarketOrder {
            ticket,
            symbol: request.symbol.clone(),
            direction: request.direction,
            volume: request.volume,
            magic_number: request.magic_number,
        });

        Ok(Fill {
            ticket,
            symbol: request.symbol.clone(),
            direction: request.direction,
            price,
            volume: request.volume,
            time,
            status: ExecutionStatus::Filled,
        })
    }

    fn submit_pending_order(&self, request: &PendingOrderRequest) -> Result<PendingAck, Rejection> {
        let mut state = self.state();
        state.take_scripted_rejection()?;
        state.check_volume(&request.symbol, request.volume)?;
        if !request.order_type.is_pending() {
            return Err(Rejection::new("market order sent as pending").with_code(10035));
        }

        let ticket = state.issue_ticket();
        state.pending.push(PendingOrder {
            ticket,
            symbol: request.symbol.clone(),
            direction: request.direction,
            order_type: request.order_type,
            target_price: request.target_price,
            volume: request.volume,
            magic_number: request.magic_number,
        });
        state.log_action(VenueAction::PendingOrder {
            ticket,
            symbol: request.symbol.clone(),
            direction: request.direction,
            order_type: request.order_type,
            target_price: request.target_price,
            volume: request.volume,
        });
        let symbol = request.symbol.clone();
        state.trigger_pending(&symbol);

        Ok(PendingAck { ticket })
    }

    fn close_position(&self, ticket: Ticket) -> Result<Fill, Rejection> {
        let mut state = self.state();
        state.take_scripted_rejection()?;
        let Some(index) = state.positions.iter().position(|p| p.ticket == ticket) else {
            return Err(Rejection::new(format!("position {ticket} not found")).with_code(10036));
        };
        let exit_side = state.positions[index].direction.opposite();
        let symbol = state.positions[index].symbol.clone();
        let Some((price, time)) = state.quote(&symbol, exit_side) else {
            return Err(Rejection::new(format!("no quote for {symbol}")).with_code(10021));
        };

        let position = state.positions.remove(index);
        state.log_action(VenueAction::ClosePosition { ticket });
        Ok(Fill {
            ticket,
            symbol,
            direction: exit_side,
            price,
            volume: position.volume,
            time,
            status: ExecutionStatus::Filled,
        })
    }

    fn cancel_pending(&self, ticket: Ticket) -> Result<(), Rejection> {
        let mut state = self.state();
        state.take_scripted_rejection()?;
        let Some(index) = state.pending.iter().position(|o| o.ticket == ticket) else {
            return Err(Rejection::new(format!("order {ticket} not found")).with_code(10036));
        };
        state.pending.remove(index);
        state.log_action(VenueAction::CancelPending { ticket });
        Ok(())
    }
}

impl Notifier for PaperVenue {
    fn notify(&self, title: &str, message: &str) {
        info!("[notification] {}: {}", title, message);
        let mut state = self.state();
        state.notifications.push((title.to_string(), message.to_string()));
        keep_last(&mut state.notifications, MAX_RECORDS);
    }
}

impl std::fmt::Debug for PaperVenue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("PaperVenue")
            .field("account", &state.summary.login)
            .field("symbols", &state.symbols.len())
            .field("positions", &state.positions.len())
            .field("pending", &state.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn venue() -> PaperVenue {
        let venue = PaperVenue::new("USD", dec!(10000)).with_symbol(SymbolInfo::new("EURUSD", "USD"));
        venue.set_tick("EURUSD", Tick::new(Utc::now(), dec!(1.1000), dec!(1.1002)));
        venue
    }

    fn market(direction: Direction, volume: Decimal, magic: MagicNumber) -> MarketOrderRequest {
        MarketOrderRequest {
            symbol: "EURUSD".into(),
            direction,
            volume,
            stop_loss: Decimal::ZERO,
            take_profit: Decimal::ZERO,
            magic_number: magic,
            comment: String::new(),
        }
    }

    #[test]
    fn market_orders_fill_at_the_touch() {
        let venue = venue();
        let buy = venue.submit_market_order(&market(Direction::Buy, dec!(0.1), 7)).unwrap();
        assert_eq!(buy.price, dec!(1.1002));
        assert_eq!(buy.status, ExecutionStatus::Filled);

        let sell = venue.submit_market_order(&market(Direction::Sell, dec!(0.1), 7)).unwrap();
        assert_eq!(sell.price, dec!(1.1000));

        assert_eq!(venue.position_counts("EURUSD", 7).unwrap(), PositionCounts::new(1, 1));
        assert_eq!(venue.position_counts("EURUSD", 8).unwrap(), PositionCounts::default());
    }

    #[test]
    fn below_minimum_volume_is_rejected() {
        let venue = venue();
        let err = venue
            .submit_market_order(&market(Direction::Buy, dec!(0.001), 7))
            .unwrap_err();
        assert_eq!(err.code, Some(10014));
        assert!(venue.positions().is_empty());
    }

    #[test]
    fn scripted_rejection_applies_once() {
        let venue = venue();
        venue.reject_next_order("market closed");
        assert!(venue.submit_market_order(&market(Direction::Buy, dec!(0.1), 7)).is_err());
        assert!(venue.submit_market_order(&market(Direction::Buy, dec!(0.1), 7)).is_ok());
        assert_eq!(
            venue.journal()[0],
            VenueAction::Rejected {
                reason: "market closed".into()
            }
        );
    }

    #[test]
    fn close_and_cancel_by_ticket() {
        let venue = venue();
        let ticket = venue.open_position("EURUSD", Direction::Buy, dec!(0.2), 7);
        let fill = venue.close_position(ticket).unwrap();
        assert_eq!(fill.direction, Direction::Sell);
        assert_eq!(fill.price, dec!(1.1000));
        assert!(venue.close_position(ticket).is_err());

        let ack = venue
            .submit_pending_order(&PendingOrderRequest {
                symbol: "EURUSD".into(),
                direction: Direction::Buy,
                order_type: OrderType::Limit,
                target_price: dec!(1.0900),
                volume: dec!(0.1),
                stop_loss: Decimal::ZERO,
                take_profit: Decimal::ZERO,
                magic_number: 7,
                comment: String::new(),
            })
            .unwrap();
        assert_eq!(venue.pending_orders_for_strategy(7).unwrap().len(), 1);
        venue.cancel_pending(ack.ticket).unwrap();
        assert!(venue.pending_orders().is_empty());
    }

    #[test]
    fn buy_limit_triggers_when_ask_drops() {
        let venue = venue();
        venue
            .submit_pending_order(&PendingOrderRequest {
                symbol: "EURUSD".into(),
                direction: Direction::Buy,
                order_type: OrderType::Limit,
                target_price: dec!(1.0950),
                volume: dec!(0.1),
                stop_loss: Decimal::ZERO,
                take_profit: Decimal::ZERO,
                magic_number: 7,
                comment: String::new(),
            })
            .unwrap();
        assert!(venue.positions().is_empty());

        venue.set_tick("EURUSD", Tick::new(Utc::now(), dec!(1.0948), dec!(1.0950)));
        assert!(venue.pending_orders().is_empty());
        assert_eq!(venue.positions()[0].open_price, dec!(1.0950));
    }

    #[test]
    fn bars_are_served_oldest_first() {
        let venue = venue();
        let t0 = Utc::now() - Duration::hours(1);
        venue.push_closes("EURUSD", t0, &[dec!(1), dec!(2), dec!(3), dec!(4)]);

        let last_two = venue.latest_closed_bars("EURUSD", Timeframe::M1, 2);
        assert_eq!(last_two.iter().map(|b| b.close).collect::<Vec<_>>(), [dec!(3), dec!(4)]);
        assert_eq!(venue.latest_closed_bars("EURUSD", Timeframe::M1, 10).len(), 4);
        assert_eq!(venue.latest_closed_bar("EURUSD", Timeframe::M1).unwrap().close, dec!(4));
        assert!(venue.latest_closed_bar("GBPUSD", Timeframe::M1).is_none());
    }

    #[test]
    fn random_walk_backfills_history() {
        let venue = venue();
        venue.attach_random_walk("EURUSD", RandomWalk::new(dec!(1.1), 3).with_interval(Duration::hours(1)), 20);
        let bars = venue.latest_closed_bars("EURUSD", Timeframe::H1, 50);
        assert_eq!(bars.len(), 20);
        assert!(bars.windows(2).all(|w| w[0].time < w[1].time));
        assert!(venue.latest_tick("EURUSD").is_some());
    }

    #[test]
    fn zero_interval_walk_still_serves_bars() {
        let venue = venue();
        venue.attach_random_walk("EURUSD", RandomWalk::new(dec!(1.1), 7).with_interval(Duration::zero()), 5);
        assert!(venue.latest_closed_bar("EURUSD", Timeframe::M1).is_some());
    }

    #[test]
    fn bar_history_is_a_rolling_window() {
        let venue = venue();
        let t0 = Utc::now() - Duration::days(30);
        for i in 0..MAX_BARS + 10 {
            venue.push_bar("EURUSD", Bar::flat(t0 + Duration::minutes(i as i64), Decimal::from(i)));
        }
        let bars = venue.latest_closed_bars("EURUSD", Timeframe::M1, MAX_BARS + 10);
        assert_eq!(bars.len(), MAX_BARS);
        assert_eq!(bars[0].close, dec!(10));
        assert_eq!(bars[MAX_BARS - 1].close, Decimal::from(MAX_BARS + 9));
    }

    #[test]
    fn journal_and_notifications_keep_the_latest_records() {
        let venue = venue();
        for i in 0..MAX_RECORDS + 5 {
            venue.reject_next_order(format!("closed {i}"));
            assert!(venue.submit_market_order(&market(Direction::Buy, dec!(0.1), 7)).is_err());
            venue.notify("Order executed", &format!("#{i}"));
        }

        let journal = venue.journal();
        assert_eq!(journal.len(), MAX_RECORDS);
        assert_eq!(journal[0], VenueAction::Rejected { reason: "closed 5".into() });

        let notifications = venue.notifications();
        assert_eq!(notifications.len(), MAX_RECORDS);
        assert_eq!(notifications[MAX_RECORDS - 1].1, format!("#{}", MAX_RECORDS + 4));
    }
}
