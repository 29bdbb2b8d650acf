pub mod context;
pub mod director;
pub mod strategy;

pub use context::{Collaborators, Session};
pub use director::{DirectorState, Pipeline, ShutdownHandle, Step, TradingDirector};
pub use strategy::{Assessor, Executor, Sizer, Strategist};
