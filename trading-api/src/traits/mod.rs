//! Narrow interfaces to the outside world.
//!
//! The pipeline never talks to a terminal, broker or chat service directly;
//! it goes through these traits, which a venue adapter implements. All of
//! them take `&self`: adapters own their synchronisation.

pub mod account;
pub mod broker;
pub mod connector;
pub mod data_feed;
pub mod notifier;
pub mod symbol_catalog;
