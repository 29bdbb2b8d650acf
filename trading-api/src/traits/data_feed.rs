//! Defines the `DataFeed` trait for market data retrieval.
//!
//! Implementors abstract over the data source (terminal, vendor API,
//! synthetic generator) and only ever hand out *closed* bars, so a strategy
//! never reacts to a candle that is still forming.

use crate::model::market_data::{Bar, Tick, Timeframe};

/// Read access to bars and quotes.
///
/// # Examples
///
/// ```
/// use trading::{Bar, DataFeed, Tick, Timeframe};
///
/// struct Silent;
///
/// impl DataFeed for Silent {
///     fn latest_closed_bar(&self, _symbol: &str, _tf: Timeframe) -> Option<Bar> {
///         None
///     }
///     fn latest_closed_bars(&self, _symbol: &str, _tf: Timeframe, _count: usize) -> Vec<Bar> {
///         Vec::new()
///     }
///     fn latest_tick(&self, _symbol: &str) -> Option<Tick> {
///         None
///     }
/// }
/// ```
pub trait DataFeed: Send {
    /// The most recent fully closed bar, or `None` if the source has none.
    fn latest_closed_bar(&self, symbol: &str, timeframe: Timeframe) -> Option<Bar>;

    /// Up to `count` closed bars, ordered oldest to newest.
    ///
    /// # Returns
    ///
    /// * `Vec<Bar>` - may be shorter than `count` (or empty) when history is thin.
    fn latest_closed_bars(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Vec<Bar>;

    fn latest_tick(&self, symbol: &str) -> Option<Tick>;
}
