//! Currency conversion through the venue's own FX quotes.

use log::{debug, error};
use rust_decimal::Decimal;
use trading::DataFeed;

/// FX instruments searched, in order, for a pair containing both currencies.
pub const DEFAULT_FX_SYMBOLS: [&str; 36] = [
    "AUDCAD", "AUDCHF", "AUDJPY", "AUDNZD", "AUDUSD", "CADCHF", "CADJPY", "CHFJPY", "EURAUD",
    "EURCAD", "EURCHF", "EURGBP", "EURJPY", "EURNZD", "EURUSD", "EURSEK", "GBPAUD", "GBPCAD",
    "GBPCHF", "GBPJPY", "GBPNZD", "GBPUSD", "NZDCAD", "NZDCHF", "NZDJPY", "NZDUSD", "USDCAD",
    "USDCHF", "USDJPY", "USDSEK", "USDNOK", "SGDUSD", "SGDEUR", "SGDJPY", "XTIUSD", "SPA500",
];

#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    symbols: Vec<String>,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::new(DEFAULT_FX_SYMBOLS.iter().map(|s| s.to_string()).collect())
    }
}

impl CurrencyConverter {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// First configured symbol whose name contains both currency codes.
    pub fn find_pair(&self, from: &str, to: &str) -> Option<&str> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();
        self.symbols
            .iter()
            .map(String::as_str)
            .find(|s| {
                let s = s.to_uppercase();
                s.contains(&from) && s.contains(&to)
            })
    }

    /// Converts `amount` from one currency to another at the pair's bid.
    ///
    /// If the pair's base currency (its first three letters) is `to`, the
    /// amount is divided by the bid, otherwise multiplied.
    ///
    /// # Returns
    ///
    /// * `Decimal` - the converted amount, or `0` if no pair or quote is available.
    pub fn convert(&self, feed: &dyn DataFeed, amount: Decimal, from: &str, to: &str) -> Decimal {
        if from.eq_ignore_ascii_case(to) {
            return amount;
        }

        let Some(pair) = self.find_pair(from, to) else {
            error!("No FX symbol found to convert {} to {}", from, to);
            return Decimal::ZERO;
        };

        let bid = match feed.latest_tick(pair) {
            Some(tick) if tick.bid > Decimal::ZERO => tick.bid,
            Some(tick) => {
                error!("Unusable bid {} for {} while converting {} to {}", tick.bid, pair, from, to);
                return Decimal::ZERO;
            }
            None => {
                error!("Unable to retrieve the latest tick for {}. Check the symbols available on the venue", pair);
                return Decimal::ZERO;
            }
        };

        let base = pair.get(..3).unwrap_or_default();
        let converted = if base.eq_ignore_ascii_case(to) {
            amount / bid
        } else {
            amount * bid
        };
        debug!("Converted {} {} -> {} {} via {} @ {}", amount, from, converted, to, pair, bid);
        converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gateway_paper::PaperVenue;
    use rust_decimal_macros::dec;
    use trading::{SymbolInfo, Tick};

    fn venue_with(symbol: &str, bid: Decimal) -> PaperVenue {
        let venue = PaperVenue::new("EUR", dec!(10000))
            .with_symbol(SymbolInfo::new(symbol, &symbol[3..]));
        venue.set_tick(symbol, Tick::new(Utc::now(), bid, bid + dec!(0.0002)));
        venue
    }

    #[test]
    fn identical_currencies_pass_through() {
        let venue = PaperVenue::new("EUR", dec!(10000));
        let fx = CurrencyConverter::default();
        assert_eq!(fx.convert(&venue, dec!(123.45), "EUR", "eur"), dec!(123.45));
    }

    #[test]
    fn divides_when_target_is_base() {
        let venue = venue_with("EURUSD", dec!(1.25));
        let fx = CurrencyConverter::default();
        assert_eq!(fx.convert(&venue, dec!(100), "USD", "EUR"), dec!(80));
    }

    #[test]
    fn multiplies_when_target_is_quote() {
        let venue = venue_with("EURUSD", dec!(1.25));
        let fx = CurrencyConverter::default();
        assert_eq!(fx.convert(&venue, dec!(100), "EUR", "USD"), dec!(125.00));
    }

    #[test]
    fn missing_pair_or_tick_yields_zero() {
        let venue = PaperVenue::new("EUR", dec!(10000));
        let fx = CurrencyConverter::default();
        // No pair lists both codes.
        assert_eq!(fx.convert(&venue, dec!(100), "BRL", "EUR"), Decimal::ZERO);
        // The pair exists but the venue has no quote for it.
        assert_eq!(fx.convert(&venue, dec!(100), "USD", "EUR"), Decimal::ZERO);
    }

    #[test]
    fn first_matching_pair_wins() {
        let fx = CurrencyConverter::default();
        assert_eq!(fx.find_pair("usd", "jpy"), Some("USDJPY"));
        assert_eq!(fx.find_pair("EUR", "USD"), Some("EURUSD"));

        let custom = CurrencyConverter::new(vec!["GBPEUR".into(), "EURGBP".into()]);
        assert_eq!(custom.find_pair("EUR", "GBP"), Some("GBPEUR"));
    }
}
