//! Risk assessment and order routing: the last two stages of the pipeline.

pub mod engine;
pub mod risk_guard;

pub use engine::OrderExecutor;
pub use risk_guard::{Policy, RiskContext, RiskDecision, RiskManager};
