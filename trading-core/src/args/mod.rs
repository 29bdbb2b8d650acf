//! Defines the command-line arguments shared by every trading binary.
//!
//! Only what cannot live in the settings file is taken from the command
//! line: where the settings file is, and a log level override for quick
//! debugging sessions.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Holds the standard configuration parameters parsed from the command line.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
pub struct CommonArgs {
    /// Name of the service (used in the startup banner)
    #[arg(short, long, default_value = "trader")]
    service_name: String,

    /// Path to the TOML settings file (optional; env vars apply on top)
    #[arg(short, long, default_value = "./config/trader.toml")]
    config: PathBuf,

    /// Overrides `log_level` from the settings (e.g. "debug", "trading_core=trace")
    #[arg(long)]
    log_level: Option<String>,
}

impl CommonArgs {
    /// Parses command-line arguments into a `CommonArgs` struct.
    ///
    /// This function automatically handles `--help` and `--version` flags via `clap`.
    /// If arguments are invalid, it will print an error and exit.
    pub fn parse_args(args: Vec<String>) -> Self {
        CommonArgs::parse_from(args)
    }

    pub fn get_service_name(&self) -> String {
        self.service_name.clone()
    }

    /// Returns the path to the settings file.
    pub fn get_config_path(&self) -> PathBuf {
        self.config.clone()
    }

    pub fn get_log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let args = CommonArgs::parse_args(vec!["trader".into()]);
        assert_eq!(args.get_service_name(), "trader");
        assert_eq!(args.get_config_path(), PathBuf::from("./config/trader.toml"));
        assert_eq!(args.get_log_level(), None);
    }

    #[test]
    fn overrides_are_parsed() {
        let args = CommonArgs::parse_args(
            ["trader", "-s", "eurusd-rsi", "--config", "/etc/t.toml", "--log-level", "debug"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert_eq!(args.get_service_name(), "eurusd-rsi");
        assert_eq!(args.get_config_path(), PathBuf::from("/etc/t.toml"));
        assert_eq!(args.get_log_level(), Some("debug"));
    }
}
