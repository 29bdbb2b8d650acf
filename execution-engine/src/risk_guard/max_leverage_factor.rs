use super::{Policy, RiskContext, RiskDecision};
use rust_decimal::Decimal;
use trading::SizingEvent;

/// Caps the strategy's total exposure at `max_leverage_factor` × equity.
///
/// Leverage is `(current + new) / equity`; the sign only says which side
/// dominates, so the ceiling applies to its absolute value.
pub struct MaxLeverageFactor {
    pub max_leverage_factor: Decimal,
}

impl Policy for MaxLeverageFactor {
    fn name(&self) -> &str {
        "max_leverage_factor"
    }

    fn check(&self, _sizing: &SizingEvent, ctx: &RiskContext) -> RiskDecision {
        if ctx.equity <= Decimal::ZERO {
            return RiskDecision::Rejected(format!(
                "equity {} leaves no room for exposure",
                ctx.equity
            ));
        }

        let leverage = (ctx.current_value + ctx.new_value) / ctx.equity;
        if leverage.abs() > self.max_leverage_factor {
            return RiskDecision::Rejected(format!(
                "leverage {} exceeds limit {}",
                leverage.round_dp(4),
                self.max_leverage_factor
            ));
        }

        RiskDecision::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use trading::{Direction, SignalEvent};

    fn sizing() -> SizingEvent {
        SizingEvent {
            signal: SignalEvent::market("EURUSD", Direction::Buy, 1),
            volume: dec!(0.1),
        }
    }

    fn check(current: Decimal, new: Decimal, equity: Decimal) -> RiskDecision {
        let policy = MaxLeverageFactor {
            max_leverage_factor: dec!(5),
        };
        policy.check(
            &sizing(),
            &RiskContext {
                current_value: current,
                new_value: new,
                equity,
            },
        )
    }

    #[test]
    fn test_rejects_above_ceiling() {
        // 5100 / 1000 = 5.1
        assert!(matches!(
            check(dec!(4900), dec!(200), dec!(1000)),
            RiskDecision::Rejected(_)
        ));
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        assert_eq!(check(dec!(4900), dec!(100), dec!(1000)), RiskDecision::Approved);
    }

    #[test]
    fn test_short_exposure_uses_absolute_leverage() {
        assert!(matches!(
            check(dec!(-4900), dec!(-200), dec!(1000)),
            RiskDecision::Rejected(_)
        ));
        // Selling against a long book reduces leverage.
        assert_eq!(check(dec!(4900), dec!(-200), dec!(1000)), RiskDecision::Approved);
    }

    #[test]
    fn test_non_positive_equity_rejects() {
        assert!(matches!(
            check(Decimal::ZERO, dec!(1), Decimal::ZERO),
            RiskDecision::Rejected(_)
        ));
        assert!(matches!(
            check(Decimal::ZERO, dec!(1), dec!(-10)),
            RiskDecision::Rejected(_)
        ));
    }
}
