use crate::error::SessionError;
use crate::fx::CurrencyConverter;
use log::{info, warn};
use rust_decimal::Decimal;
use trading::{
    Account, AccountMode, AccountSummary, Broker, Connector, DataFeed, MagicNumber, Notifier,
    SymbolCatalog, TradingError,
};

/// The venue adapters a session is built from.
pub struct Collaborators {
    pub feed: Box<dyn DataFeed>,
    pub account: Box<dyn Account>,
    pub catalog: Box<dyn SymbolCatalog>,
    pub broker: Box<dyn Broker>,
    pub notifier: Box<dyn Notifier>,
    pub connector: Box<dyn Connector>,
}

/// An open connection to the venue, threaded through every stage.
///
/// Stages read market data, account state and contract specs through the
/// session and never hold collaborators of their own.
pub struct Session {
    collaborators: Collaborators,
    magic_number: MagicNumber,
    converter: CurrencyConverter,
    summary: AccountSummary,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("magic_number", &self.magic_number)
            .field("converter", &self.converter)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Connects to the venue and checks the account is safe to trade.
    ///
    /// # Arguments
    ///
    /// * `collaborators` - The venue adapters.
    /// * `magic_number` - Tag of every order this session places.
    /// * `converter` - FX universe used to value foreign-currency amounts.
    /// * `allow_live` - Whether a real-money account may be traded.
    ///
    /// # Returns
    ///
    /// * `Err(SessionError)` - on connection failure, a refused live account
    ///   or disabled automated trading. The connection is closed again in
    ///   the latter two cases.
    pub fn open(
        collaborators: Collaborators,
        magic_number: MagicNumber,
        converter: CurrencyConverter,
        allow_live: bool,
    ) -> Result<Self, SessionError> {
        let summary = collaborators.connector.connect()?;
        info!("Connected to {} as {} ({})", summary.server, summary.login, summary.holder);

        match summary.mode {
            AccountMode::Demo => info!("DEMO account detected"),
            AccountMode::Contest => info!("CONTEST account detected"),
            AccountMode::Real if allow_live => {
                warn!("REAL account detected. Capital is at risk");
            }
            AccountMode::Real => {
                collaborators.connector.disconnect();
                return Err(SessionError::LiveAccountRefused {
                    login: summary.login,
                    server: summary.server,
                });
            }
        }

        if !summary.trade_allowed {
            collaborators.connector.disconnect();
            return Err(SessionError::TradingDisabled);
        }

        info!(
            "Account {} | balance {} {} | equity {} {} | leverage 1:{}",
            summary.login,
            summary.balance,
            summary.currency,
            summary.equity,
            summary.currency,
            summary.leverage
        );

        Ok(Self {
            collaborators,
            magic_number,
            converter,
            summary,
        })
    }

    /// Warns about symbols the venue does not list.
    ///
    /// # Returns
    ///
    /// * `usize` - how many of `symbols` are known.
    pub fn check_symbols(&self, symbols: &[String]) -> usize {
        symbols
            .iter()
            .filter(|symbol| {
                let known = self.catalog().symbol_info(symbol).is_some();
                if !known {
                    warn!("Symbol {} is not available on the venue", symbol);
                }
                known
            })
            .count()
    }

    /// Disconnects from the venue.
    pub fn close(self) {
        info!("Closing session for account {}", self.summary.login);
        self.collaborators.connector.disconnect();
    }

    pub fn feed(&self) -> &dyn DataFeed {
        self.collaborators.feed.as_ref()
    }

    pub fn account(&self) -> &dyn Account {
        self.collaborators.account.as_ref()
    }

    pub fn catalog(&self) -> &dyn SymbolCatalog {
        self.collaborators.catalog.as_ref()
    }

    pub fn broker(&self) -> &dyn Broker {
        self.collaborators.broker.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.collaborators.notifier.as_ref()
    }

    pub fn magic_number(&self) -> MagicNumber {
        self.magic_number
    }

    pub fn summary(&self) -> &AccountSummary {
        &self.summary
    }

    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    /// Converts through the session's FX universe.
    ///
    /// # Returns
    ///
    /// * `Err(TradingError::ConversionUnavailable)` - a non-zero amount converted to zero.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal, TradingError> {
        let converted = self.converter.convert(self.feed(), amount, from, to);
        if converted.is_zero() && !amount.is_zero() {
            return Err(TradingError::ConversionUnavailable {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(converted)
    }
}
