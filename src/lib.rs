//! putscout: support-level cash-secured put recommender and backtester.
//!
//! Hexagonal architecture: pure analytics in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
