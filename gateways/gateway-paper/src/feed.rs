//! Synthetic price generator.
//!
//! Produces a seeded random walk of closed bars, each close moving at most
//! `max_step_bp` basis points away from the previous one.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use trading::Bar;

const BP: u32 = 4;

#[derive(Debug, Clone)]
pub struct RandomWalk {
    price: Decimal,
    rng: StdRng,
    interval: Duration,
    decimals: u32,
    max_step_bp: i64,
}

impl RandomWalk {
    /// A walk starting at `start_price`, one bar per second, ±1% per bar.
    pub fn new(start_price: Decimal, seed: u64) -> Self {
        Self {
            price: start_price,
            rng: StdRng::seed_from_u64(seed),
            interval: Duration::seconds(1),
            decimals: 5,
            max_step_bp: 100,
        }
    }

    /// Bar length; anything shorter than a millisecond becomes one.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::milliseconds(1));
        self
    }

    /// Decimal places prices are rounded to.
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_max_step_bp(mut self, max_step_bp: i64) -> Self {
        self.max_step_bp = max_step_bp.max(0);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Generates the bar opening at `time`.
    pub fn next_bar(&mut self, time: DateTime<Utc>) -> Bar {
        let open = self.price;
        let step = Decimal::new(self.rng.gen_range(-self.max_step_bp..=self.max_step_bp), BP);
        let floor = Decimal::new(1, self.decimals);
        let close = (open * (Decimal::ONE + step)).round_dp(self.decimals).max(floor);

        let wiggle = Decimal::new(self.rng.gen_range(0..=self.max_step_bp / 4), BP);
        let high = (open.max(close) * (Decimal::ONE + wiggle)).round_dp(self.decimals);
        let low = (open.min(close) * (Decimal::ONE - wiggle))
            .round_dp(self.decimals)
            .max(floor);

        self.price = close;
        Bar {
            time,
            open,
            high,
            low,
            close,
            tick_volume: self.rng.gen_range(1..500),
            volume: 0,
            spread: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn same_seed_same_path() {
        let t0 = Utc::now();
        let mut a = RandomWalk::new(dec!(1.10000), 42);
        let mut b = RandomWalk::new(dec!(1.10000), 42);
        for i in 0..50 {
            let t = t0 + Duration::seconds(i);
            assert_eq!(a.next_bar(t), b.next_bar(t));
        }
    }

    #[test]
    fn bars_are_consistent_and_bounded() {
        let t0 = Utc::now();
        let mut walk = RandomWalk::new(dec!(100), 7).with_decimals(2);
        let mut previous = walk.price();
        for i in 0..200 {
            let bar = walk.next_bar(t0 + Duration::seconds(i));
            assert_eq!(bar.open, previous);
            assert!(bar.high >= bar.open.max(bar.close));
            assert!(bar.low <= bar.open.min(bar.close));
            assert!(bar.low > Decimal::ZERO);
            let moved = ((bar.close - bar.open) / bar.open).abs();
            assert!(moved <= dec!(0.0101), "step {moved} too large");
            previous = bar.close;
        }
    }

    #[test]
    fn non_positive_interval_is_clamped() {
        assert_eq!(RandomWalk::new(dec!(1), 1).with_interval(Duration::zero()).interval(), Duration::milliseconds(1));
        assert_eq!(RandomWalk::new(dec!(1), 1).with_interval(Duration::seconds(-5)).interval(), Duration::milliseconds(1));
        assert_eq!(RandomWalk::new(dec!(1), 1).with_interval(Duration::minutes(1)).interval(), Duration::minutes(1));
    }
}
