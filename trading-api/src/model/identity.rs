//! Identifiers shared with the venue.

/// Tags every order and position a strategy instance owns, so that
/// flattening never touches other strategies or manual trades.
pub type MagicNumber = u64;

/// Venue-assigned identifier of a position or resting order.
pub type Ticket = u64;
