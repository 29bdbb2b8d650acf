//! Signal generators.
//!
//! Each generator looks at the latest closed bars of the symbol that just
//! printed a new bar and emits at most one market-order intent, flattening
//! the opposite side first when it reverses.

pub mod signals;

use signals::{ma_crossover::MaCrossover, rsi::RsiMeanReversion};
use trading::Timeframe;
use trading_core::properties::SignalProps;
use trading_core::{ConfigError, Strategist};

/// Builds the generator selected by `props`.
///
/// # Returns
///
/// * `Err(ConfigError)` - the parameters are inconsistent (e.g. fast period not below slow).
pub fn build_strategist(props: &SignalProps, timeframe: Timeframe) -> Result<Box<dyn Strategist>, ConfigError> {
    let strategist: Box<dyn Strategist> = match props {
        SignalProps::MaCrossover(p) => Box::new(MaCrossover::new(p, timeframe)?),
        SignalProps::Rsi(p) => Box::new(RsiMeanReversion::new(p, timeframe)?),
    };
    log::info!("Signal generator: {} on {}", props.name(), timeframe);
    Ok(strategist)
}
