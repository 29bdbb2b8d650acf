use log::{debug, info, warn};
use rust_decimal::Decimal;
use trading::{Direction, OrderEvent, SizingEvent, TradingError};
use trading_core::properties::RiskProps;
use trading_core::{Assessor, Session};

pub mod max_leverage_factor;

use max_leverage_factor::MaxLeverageFactor;

#[derive(Debug, PartialEq)]
pub enum RiskDecision {
    Approved,
    Rejected(String),
}

/// Exposure figures a policy decides on, all in account currency.
///
/// Long exposure is positive, short exposure negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskContext {
    /// Signed value of the strategy's open positions.
    pub current_value: Decimal,
    /// Signed value of the candidate order.
    pub new_value: Decimal,
    pub equity: Decimal,
}

pub trait Policy: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, sizing: &SizingEvent, ctx: &RiskContext) -> RiskDecision;
}

/// Values the strategy's exposure and runs the configured policy.
///
/// Approval is binary: the order goes through at the sized volume or not at
/// all.
pub struct RiskManager {
    policy: Box<dyn Policy>,
}

impl RiskManager {
    pub fn new(policy: Box<dyn Policy>) -> Self {
        Self { policy }
    }

    pub fn from_props(props: &RiskProps) -> Self {
        let policy: Box<dyn Policy> = match props {
            RiskProps::MaxLeverageFactor {
                max_leverage_factor,
            } => Box::new(MaxLeverageFactor {
                max_leverage_factor: *max_leverage_factor,
            }),
        };
        info!("Risk policy: {}", props.name());
        Self::new(policy)
    }
}

/// `volume * contract_size * bid`, in account currency, negative for sells.
///
/// # Returns
///
/// * `Err(TradingError::DataUnavailable)` - unknown symbol or no quote.
/// * `Err(TradingError::ConversionUnavailable)` - no FX path to the account currency.
pub fn position_value(
    session: &Session,
    symbol: &str,
    direction: Direction,
    volume: Decimal,
    account_ccy: &str,
) -> Result<Decimal, TradingError> {
    let info = session
        .catalog()
        .symbol_info(symbol)
        .ok_or_else(|| TradingError::unavailable(symbol, "symbol info"))?;
    let tick = session
        .feed()
        .latest_tick(symbol)
        .ok_or_else(|| TradingError::unavailable(symbol, "tick"))?;

    let value_quote = volume * info.get_contract_size() * tick.bid;
    let value = session.convert(value_quote, info.get_quote_currency(), account_ccy)?;
    Ok(value * Decimal::from(direction.sign()))
}

impl RiskManager {
    fn context(&self, sizing: &SizingEvent, session: &Session) -> Result<RiskContext, TradingError> {
        let account_ccy = session.account().currency()?;
        let equity = session.account().equity()?;

        let mut current_value = Decimal::ZERO;
        for position in session
            .account()
            .open_positions_for_strategy(session.magic_number())?
        {
            current_value += position_value(
                session,
                &position.symbol,
                position.direction,
                position.volume,
                &account_ccy,
            )?;
        }

        let signal = &sizing.signal;
        let new_value = position_value(
            session,
            &signal.symbol,
            signal.direction,
            sizing.volume,
            &account_ccy,
        )?;

        Ok(RiskContext {
            current_value,
            new_value,
            equity,
        })
    }
}

impl Assessor for RiskManager {
    fn name(&self) -> &str {
        self.policy.name()
    }

    fn assess_order(
        &self,
        sizing: &SizingEvent,
        session: &Session,
    ) -> Result<Option<OrderEvent>, TradingError> {
        let symbol = sizing.signal.symbol.as_str();
        let ctx = match self.context(sizing, session) {
            Ok(ctx) => ctx,
            Err(e @ TradingError::ConversionUnavailable { .. }) => {
                warn!("{}: {}, order rejected", symbol, e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        debug!(
            "{}: current exposure {}, new {}, equity {}",
            symbol, ctx.current_value, ctx.new_value, ctx.equity
        );

        match self.policy.check(sizing, &ctx) {
            RiskDecision::Approved => Ok(Some(OrderEvent::approve(sizing.clone(), sizing.volume))),
            RiskDecision::Rejected(reason) => {
                warn!(
                    "{} {} {} rejected by policy {}: {}",
                    sizing.signal.direction,
                    sizing.volume,
                    symbol,
                    self.policy.name(),
                    reason
                );
                Ok(None)
            }
        }
    }
}
