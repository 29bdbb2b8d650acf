//! # Trading Core Library
//!
//! The runtime shared by every pipeline stage.
//!
//! ## Modules
//! - `args`: Standardized argument parsing.
//! - `settings`: Layered run configuration (TOML file + environment).
//! - `properties`: Tagged parameter sets selecting each stage's strategy.
//! - `fx`: Currency conversion through the venue's FX quotes.
//! - `framework`: The `Session` context, stage traits and the `TradingDirector` loop.
//! - `error`: Configuration, session and dispatcher errors.

pub mod args;
pub mod error;
pub mod framework;
pub mod fx;
pub mod properties;
pub mod settings;

pub use error::{ConfigError, DirectorError, SessionError};
pub use framework::context::{Collaborators, Session};
pub use framework::director::{DirectorState, Pipeline, ShutdownHandle, Step, TradingDirector};
pub use framework::strategy::{Assessor, Executor, Sizer, Strategist};
