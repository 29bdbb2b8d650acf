use chrono::Utc;
use gateway_paper::PaperVenue;
use rust_decimal_macros::dec;
use trading::{AccountMode, SymbolInfo, Tick, TradingError};
use trading_core::fx::CurrencyConverter;
use trading_core::{Collaborators, Session, SessionError};

fn collaborators(venue: &PaperVenue) -> Collaborators {
    Collaborators {
        feed: Box::new(venue.clone()),
        account: Box::new(venue.clone()),
        catalog: Box::new(venue.clone()),
        broker: Box::new(venue.clone()),
        notifier: Box::new(venue.clone()),
        connector: Box::new(venue.clone()),
    }
}

#[test]
fn test_demo_account_opens_and_closes() {
    let venue = PaperVenue::new("USD", dec!(5000));
    let session = Session::open(collaborators(&venue), 3, CurrencyConverter::default(), false).unwrap();

    assert!(venue.is_connected());
    assert_eq!(session.magic_number(), 3);
    assert_eq!(session.summary().equity, dec!(5000));

    session.close();
    assert!(!venue.is_connected());
}

#[test]
fn test_real_account_is_refused_unless_allowed() {
    let venue = PaperVenue::new("USD", dec!(5000)).with_mode(AccountMode::Real);
    let err = Session::open(collaborators(&venue), 3, CurrencyConverter::default(), false).unwrap_err();
    assert!(matches!(err, SessionError::LiveAccountRefused { .. }));
    assert!(!venue.is_connected());

    assert!(Session::open(collaborators(&venue), 3, CurrencyConverter::default(), true).is_ok());
}

#[test]
fn test_disabled_trading_is_refused() {
    let venue = PaperVenue::new("USD", dec!(5000)).with_trade_allowed(false);
    let err = Session::open(collaborators(&venue), 3, CurrencyConverter::default(), false).unwrap_err();
    assert!(matches!(err, SessionError::TradingDisabled));
    assert!(!venue.is_connected());
}

#[test]
fn test_check_symbols_counts_known_ones() {
    let venue = PaperVenue::new("USD", dec!(5000)).with_symbol(SymbolInfo::new("EURUSD", "USD"));
    let session = Session::open(collaborators(&venue), 3, CurrencyConverter::default(), false).unwrap();
    let symbols = vec!["EURUSD".to_string(), "XAUUSD".to_string()];
    assert_eq!(session.check_symbols(&symbols), 1);
}

#[test]
fn test_convert_reports_missing_quotes() {
    let venue = PaperVenue::new("USD", dec!(5000));
    let session = Session::open(collaborators(&venue), 3, CurrencyConverter::default(), false).unwrap();

    assert_eq!(session.convert(dec!(10), "USD", "USD").unwrap(), dec!(10));
    let err = session.convert(dec!(10), "EUR", "USD").unwrap_err();
    assert!(matches!(err, TradingError::ConversionUnavailable { .. }));

    venue.set_tick("EURUSD", Tick::new(Utc::now(), dec!(1.25), dec!(1.2502)));
    assert_eq!(session.convert(dec!(10), "EUR", "USD").unwrap(), dec!(12.50));
    assert_eq!(session.convert(dec!(10), "USD", "EUR").unwrap(), dec!(8));
}
