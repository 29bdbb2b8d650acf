//! Paper trading venue.
//!
//! An in-memory stand-in for a trading terminal: fills market orders at the
//! current quote, rests and triggers pending orders, tracks positions per
//! magic number and generates synthetic bars from a seeded random walk.
//! Equity is not marked to market; set it explicitly with `set_equity`.

pub mod feed;
pub mod venue;

pub use feed::RandomWalk;
pub use venue::{PaperVenue, VenueAction};
