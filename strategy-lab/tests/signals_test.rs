use chrono::{Duration, Utc};
use gateway_paper::PaperVenue;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Mutex;
use strategy_lab::build_strategist;
use trading::{Account, Bar, Broker, DataEvent, Direction, SymbolInfo, Tick, Timeframe, TradingError};
use trading_core::fx::CurrencyConverter;
use trading_core::properties::{MaCrossoverProps, RsiProps, SignalProps};
use trading_core::{Collaborators, Executor, Session};

const MAGIC: u64 = 12345;

fn session(venue: &PaperVenue) -> Session {
    Session::open(
        Collaborators {
            feed: Box::new(venue.clone()),
            account: Box::new(venue.clone()),
            catalog: Box::new(venue.clone()),
            broker: Box::new(venue.clone()),
            notifier: Box::new(venue.clone()),
            connector: Box::new(venue.clone()),
        },
        MAGIC,
        CurrencyConverter::default(),
        false,
    )
    .unwrap()
}

fn venue_with_closes(closes: &[Decimal]) -> PaperVenue {
    let venue = PaperVenue::new("USD", dec!(10000)).with_symbol(SymbolInfo::new("EURUSD", "USD"));
    venue.push_closes("EURUSD", Utc::now() - Duration::hours(1), closes);
    venue
}

fn data_event(venue: &PaperVenue) -> DataEvent {
    use trading::DataFeed;
    DataEvent {
        symbol: "EURUSD".into(),
        bar: venue.latest_closed_bar("EURUSD", Timeframe::M1).unwrap(),
    }
}

/// Records flatten requests and closes through the venue, so tests can check
/// what happened before the signal came out.
#[derive(Default)]
struct RecordingExecutor {
    calls: Mutex<Vec<(String, Direction)>>,
}

impl Executor for RecordingExecutor {
    fn execute_order(&self, _order: &trading::OrderEvent, _session: &Session) -> Result<Option<trading::Event>, TradingError> {
        Ok(None)
    }

    fn close_strategy_positions(&self, session: &Session, symbol: &str, side: Direction) -> Result<usize, TradingError> {
        self.calls.lock().unwrap().push((symbol.to_string(), side));
        let mut closed = 0;
        for p in session.account().open_positions_for_strategy(session.magic_number())? {
            if p.symbol == symbol && p.direction == side {
                session.broker().close_position(p.ticket)?;
                closed += 1;
            }
        }
        Ok(closed)
    }

    fn cancel_strategy_pending_orders(&self, _session: &Session, _symbol: &str, _side: Direction) -> Result<usize, TradingError> {
        Ok(0)
    }
}

fn ma(fast: usize, slow: usize) -> SignalProps {
    SignalProps::MaCrossover(MaCrossoverProps {
        fast_period: fast,
        slow_period: slow,
        sl_points: 0,
        tp_points: 0,
    })
}

fn rsi(sl_points: i64, tp_points: i64) -> SignalProps {
    SignalProps::Rsi(RsiProps {
        period: 2,
        upper: dec!(70),
        lower: dec!(30),
        sl_points,
        tp_points,
    })
}

#[test]
fn ma_crossover_buys_on_rising_closes() {
    let venue = venue_with_closes(&[dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)]);
    let session = session(&venue);
    let executor = RecordingExecutor::default();
    let strategist = build_strategist(&ma(2, 3), Timeframe::M1).unwrap();

    let signal = strategist
        .generate_signal(&data_event(&venue), &session, &executor)
        .unwrap()
        .expect("a buy signal");
    assert_eq!(signal.direction, Direction::Buy);
    assert_eq!(signal.magic_number, MAGIC);
    assert_eq!(signal.target_price, Decimal::ZERO);
    assert_eq!(signal.stop_loss, Decimal::ZERO);
}

#[test]
fn ma_crossover_stays_out_when_already_long() {
    let venue = venue_with_closes(&[dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)]);
    venue.open_position("EURUSD", Direction::Buy, dec!(0.1), MAGIC);
    let session = session(&venue);
    let strategist = build_strategist(&ma(2, 3), Timeframe::M1).unwrap();

    let signal = strategist
        .generate_signal(&data_event(&venue), &session, &RecordingExecutor::default())
        .unwrap();
    assert!(signal.is_none());
}

#[test]
fn ma_crossover_without_enough_history_is_unavailable() {
    let venue = venue_with_closes(&[dec!(1), dec!(2)]);
    let session = session(&venue);
    let strategist = build_strategist(&ma(2, 3), Timeframe::M1).unwrap();

    let err = strategist
        .generate_signal(&data_event(&venue), &session, &RecordingExecutor::default())
        .unwrap_err();
    assert!(matches!(err, TradingError::DataUnavailable { .. }));
}

#[test]
fn reversal_closes_opposite_side_before_signalling() {
    let venue = venue_with_closes(&[dec!(5), dec!(4), dec!(3), dec!(2), dec!(1)]);
    let long = venue.open_position("EURUSD", Direction::Buy, dec!(0.1), MAGIC);
    let manual = venue.open_position("EURUSD", Direction::Buy, dec!(0.3), 0);
    let session = session(&venue);
    let executor = RecordingExecutor::default();
    let strategist = build_strategist(&ma(2, 3), Timeframe::M1).unwrap();

    let signal = strategist
        .generate_signal(&data_event(&venue), &session, &executor)
        .unwrap()
        .expect("a sell signal");

    assert_eq!(signal.direction, Direction::Sell);
    assert_eq!(
        *executor.calls.lock().unwrap(),
        vec![("EURUSD".to_string(), Direction::Buy)]
    );
    // The strategy's long is gone by the time the signal exists; the manual one stays.
    let remaining: Vec<_> = venue.positions().iter().map(|p| p.ticket).collect();
    assert!(!remaining.contains(&long));
    assert!(remaining.contains(&manual));
}

#[test]
fn rsi_buys_on_falling_closes() {
    let venue = venue_with_closes(&[dec!(10), dec!(9), dec!(8)]);
    let session = session(&venue);
    let strategist = build_strategist(&rsi(0, 0), Timeframe::M1).unwrap();

    let signal = strategist
        .generate_signal(&data_event(&venue), &session, &RecordingExecutor::default())
        .unwrap()
        .expect("a buy signal");
    assert_eq!(signal.direction, Direction::Buy);
}

#[test]
fn rsi_sets_stops_from_the_quote() {
    let venue = venue_with_closes(&[dec!(1.2), dec!(1.1), dec!(1.0)]);
    venue.set_tick("EURUSD", Tick::new(Utc::now(), dec!(1.00000), dec!(1.00020)));
    let session = session(&venue);
    let strategist = build_strategist(&rsi(50, 70), Timeframe::M1).unwrap();

    let signal = strategist
        .generate_signal(&data_event(&venue), &session, &RecordingExecutor::default())
        .unwrap()
        .expect("a buy signal");
    // Buys are measured from the ask, 1 point = 0.00001.
    assert_eq!(signal.stop_loss, dec!(0.99970));
    assert_eq!(signal.take_profit, dec!(1.00090));
}

#[test]
fn rsi_sell_stops_from_the_bid() {
    let venue = venue_with_closes(&[dec!(1.0), dec!(1.1), dec!(1.2)]);
    venue.set_tick("EURUSD", Tick::new(Utc::now(), dec!(1.20000), dec!(1.20020)));
    let session = session(&venue);
    let strategist = build_strategist(&rsi(50, 0), Timeframe::M1).unwrap();

    let signal = strategist
        .generate_signal(&data_event(&venue), &session, &RecordingExecutor::default())
        .unwrap()
        .expect("a sell signal");
    assert_eq!(signal.direction, Direction::Sell);
    assert_eq!(signal.stop_loss, dec!(1.20050));
    assert_eq!(signal.take_profit, Decimal::ZERO);
}

#[test]
fn invalid_parameters_fail_at_construction() {
    assert!(build_strategist(&ma(5, 5), Timeframe::M1).is_err());
}

#[test]
fn flat_closes_give_no_signal() {
    // Flat closes: neither moving average is above the other.
    let venue = PaperVenue::new("USD", dec!(10000)).with_symbol(SymbolInfo::new("EURUSD", "USD"));
    let t0 = Utc::now() - Duration::hours(1);
    for i in 0..3 {
        venue.push_bar("EURUSD", Bar::flat(t0 + Duration::minutes(i), dec!(1.1)));
    }
    let session = session(&venue);
    let strategist = build_strategist(&ma(2, 3), Timeframe::M1).unwrap();
    let signal = strategist
        .generate_signal(&data_event(&venue), &session, &RecordingExecutor::default())
        .unwrap();
    assert!(signal.is_none());
}
