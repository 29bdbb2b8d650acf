use thiserror::Error;
use trading::{MalformedEvent, TradingError};

/// Raised while building the pipeline, before the loop starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A stage was configured with parameters it cannot work with.
    #[error("invalid parameters for {strategy}: {reason}")]
    InvalidParameters {
        strategy: &'static str,
        reason: String,
    },

    /// A setting is present but unusable.
    #[error("invalid setting '{key}': {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    /// The settings file or environment could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn invalid(strategy: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameters {
            strategy,
            reason: reason.into(),
        }
    }
}

/// Fatal dispatcher failures. The director is `Stopped` once one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectorError {
    #[error("cannot route event: {0}")]
    MalformedEvent(#[from] MalformedEvent),
}

/// Raised while opening a trading session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The terminal could not be reached or logged into.
    #[error("connection failed: {0}")]
    Connect(#[from] TradingError),

    /// The account is a real-money account and live trading was not enabled.
    #[error("account {login} on {server} is a real-money account; set allow_live_account to trade it")]
    LiveAccountRefused { login: u64, server: String },

    /// Automated trading is switched off on the terminal.
    #[error("algorithmic trading is disabled on the terminal; enable it manually")]
    TradingDisabled,
}

/// A specialized Result type for configuration steps.
pub type Result<T> = std::result::Result<T, ConfigError>;
