//! Run configuration.
//!
//! Settings are layered with the `config` crate: an optional TOML file first,
//! then environment variables prefixed with `TRADER` (nested keys separated by
//! `__`, e.g. `TRADER__RISK__MAX_LEVERAGE_FACTOR=3`).

use crate::error::{ConfigError, Result};
use crate::fx::CurrencyConverter;
use crate::properties::{RiskProps, SignalProps, SizingProps};
use config::{Config, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use trading::{MagicNumber, Timeframe};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Symbols the director polls for new bars.
    pub symbols: Vec<String>,

    pub timeframe: Timeframe,

    /// Tag applied to every order of this run.
    pub magic_number: MagicNumber,

    /// Pause between loop iterations.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// FX instruments used for currency conversion (defaults to the built-in list).
    #[serde(default)]
    pub fx_symbols: Option<Vec<String>>,

    /// Refuse real-money accounts unless set.
    #[serde(default)]
    pub allow_live_account: bool,

    pub signal: SignalProps,
    pub sizing: SizingProps,
    pub risk: RiskProps,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub paper: PaperSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Parameters of the simulated venue used by the demo binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperSettings {
    pub equity: Decimal,
    pub currency: String,
    pub start_price: Decimal,
    pub seed: u64,
    /// Wall-clock milliseconds per synthetic bar.
    pub bar_interval_ms: u64,
    /// Largest close-to-close move of the random walk, in basis points.
    pub max_step_bp: i64,
    /// Quoted spread, in points.
    pub spread_points: i64,
}

impl Default for PaperSettings {
    fn default() -> Self {
        Self {
            equity: Decimal::from(10_000),
            currency: "USD".to_string(),
            start_price: Decimal::ONE,
            seed: 7,
            bar_interval_ms: 1_000,
            max_step_bp: 100,
            spread_points: 10,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_ms() -> u64 {
    10
}

fn enabled() -> bool {
    true
}

/// Builds the layered source: `path` (if it exists) overlaid by `TRADER__*` variables.
pub fn load_source(path: &Path) -> Result<Config> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("TRADER")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("symbols")
                .with_list_parse_key("fx_symbols")
                .try_parsing(true),
        )
        .build()?;
    Ok(config)
}

impl Settings {
    /// Loads and validates settings from `path` plus the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Self::from_config(load_source(path)?)?;
        Ok(settings)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from a TOML string (no environment overlay).
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_config(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: "symbols",
                reason: "at least one symbol is required".into(),
            });
        }
        if let Some(blank) = self.symbols.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::InvalidSetting {
                key: "symbols",
                reason: format!("blank symbol {blank:?}"),
            });
        }
        if matches!(&self.fx_symbols, Some(list) if list.is_empty()) {
            return Err(ConfigError::InvalidSetting {
                key: "fx_symbols",
                reason: "list is empty; omit it to use the default FX universe".into(),
            });
        }
        if self.paper.bar_interval_ms == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "paper.bar_interval_ms",
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn currency_converter(&self) -> CurrencyConverter {
        match &self.fx_symbols {
            Some(symbols) => CurrencyConverter::new(symbols.clone()),
            None => CurrencyConverter::default(),
        }
    }
}
