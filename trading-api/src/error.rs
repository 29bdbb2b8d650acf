use thiserror::Error;

/// Non-fatal failures of a pipeline stage.
///
/// None of these stop the director: the stage that hit them logs the
/// problem, emits nothing and the loop moves on to the next event.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradingError {
    /// A collaborator had no answer (no bars, no tick, unknown symbol...).
    #[error("{what} unavailable for {symbol}")]
    DataUnavailable { symbol: String, what: &'static str },

    /// No FX instrument could price one currency in the other.
    #[error("cannot convert {from} to {to}")]
    ConversionUnavailable { from: String, to: String },

    /// A policy or the venue refused the request.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl TradingError {
    pub fn unavailable(symbol: impl Into<String>, what: &'static str) -> Self {
        TradingError::DataUnavailable {
            symbol: symbol.into(),
            what,
        }
    }
}

/// A refusal reported by the order gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("venue rejected request{}: {reason}", code.map(|c| format!(" (code {c})")).unwrap_or_default())]
pub struct Rejection {
    pub code: Option<u32>,
    pub reason: String,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            code: None,
            reason: reason.into(),
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }
}

impl From<Rejection> for TradingError {
    fn from(rejection: Rejection) -> Self {
        TradingError::Rejected(rejection.to_string())
    }
}
