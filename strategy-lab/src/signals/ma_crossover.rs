//! Moving-average crossover.
//!
//! Goes long while the fast mean of closes is above the slow mean and short
//! while it is below.

use super::{enter, mean, StopPoints};
use log::debug;
use trading::prelude::*;
use trading::Timeframe;
use trading_core::properties::MaCrossoverProps;
use trading_core::{ConfigError, Executor, Session, Strategist};

pub struct MaCrossover {
    timeframe: Timeframe,
    fast_period: usize,
    slow_period: usize,
    points: StopPoints,
}

impl MaCrossover {
    /// Clamps the fast period to at least 2 and the slow period to at least 3.
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError)` - the fast period is not strictly below the slow one.
    pub fn new(props: &MaCrossoverProps, timeframe: Timeframe) -> Result<Self, ConfigError> {
        let fast_period = props.fast_period.max(2);
        let slow_period = props.slow_period.max(3);
        if fast_period >= slow_period {
            return Err(ConfigError::invalid(
                "ma_crossover",
                format!("fast period {fast_period} must be lower than slow period {slow_period}"),
            ));
        }
        Ok(Self {
            timeframe,
            fast_period,
            slow_period,
            points: StopPoints::new(props.sl_points, props.tp_points),
        })
    }

    pub fn periods(&self) -> (usize, usize) {
        (self.fast_period, self.slow_period)
    }

    /// `(fast, slow)` means over the last `slow_period` closes.
    pub fn moving_averages(&self, closes: &[Decimal]) -> Option<(Decimal, Decimal)> {
        if closes.len() < self.slow_period {
            return None;
        }
        let window = &closes[closes.len() - self.slow_period..];
        let fast = mean(&window[window.len() - self.fast_period..]);
        let slow = mean(window);
        Some((fast, slow))
    }
}

impl Strategist for MaCrossover {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn generate_signal(
        &self,
        event: &DataEvent,
        session: &Session,
        executor: &dyn Executor,
    ) -> Result<Option<SignalEvent>, TradingError> {
        let symbol = event.symbol.as_str();
        let closes: Vec<Decimal> = session
            .feed()
            .latest_closed_bars(symbol, self.timeframe, self.slow_period)
            .iter()
            .map(|b| b.close)
            .collect();

        let Some((fast, slow)) = self.moving_averages(&closes) else {
            return Err(TradingError::unavailable(symbol, "bar history"));
        };
        debug!("{} fast MA {} slow MA {}", symbol, fast.round_dp(6), slow.round_dp(6));

        let counts = session
            .account()
            .position_counts(symbol, session.magic_number())?;
        enter(session, executor, symbol, counts, fast > slow, slow > fast, self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn props(fast: usize, slow: usize) -> MaCrossoverProps {
        MaCrossoverProps {
            fast_period: fast,
            slow_period: slow,
            sl_points: 0,
            tp_points: 0,
        }
    }

    #[test]
    fn periods_are_clamped() {
        let ma = MaCrossover::new(&props(0, 1), Timeframe::M1).unwrap();
        assert_eq!(ma.periods(), (2, 3));
    }

    #[test]
    fn fast_not_below_slow_is_rejected() {
        assert!(MaCrossover::new(&props(10, 10), Timeframe::M1).is_err());
        assert!(MaCrossover::new(&props(12, 5), Timeframe::M1).is_err());
        // Clamping can create the conflict too: 3 vs clamped 3.
        assert!(MaCrossover::new(&props(3, 2), Timeframe::M1).is_err());
    }

    #[test]
    fn averages_use_the_trailing_window() {
        let ma = MaCrossover::new(&props(2, 3), Timeframe::M1).unwrap();
        let (fast, slow) = ma
            .moving_averages(&[dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)])
            .unwrap();
        assert_eq!(fast, dec!(4.5));
        assert_eq!(slow, dec!(4));
        assert!(ma.moving_averages(&[dec!(1), dec!(2)]).is_none());
    }
}
