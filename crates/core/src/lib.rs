//! Core domain for GigLedger.
//!
//! Holds the domain models (transactions, savings goals, tax), the pure
//! aggregation and formatting helpers the dashboard is built from, and the
//! collaborator contracts for the backing store and the auth provider.
//! Storage crates (`storage-memory`, `remote-store`) implement those
//! contracts; nothing in this crate performs I/O itself.

pub mod auth;
pub mod calculations;
pub mod constants;
pub mod context;
pub mod dashboard;
pub mod errors;
pub mod formatters;
pub mod goals;
pub mod insights;
pub mod navigation;
pub mod store;
pub mod styles;
pub mod tax;
pub mod transactions;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use context::{AppContext, SessionGuard};
pub use errors::{Error, Result};
