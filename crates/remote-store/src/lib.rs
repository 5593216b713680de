//! Remote backend for GigLedger.
//!
//! Talks to a hosted backend-as-a-service exposing a Postgres-REST data API
//! (`/rest/v1`) and a token auth API (`/auth/v1`). [`RemoteClient`]
//! implements both [`DataStore`](gigledger_core::store::DataStore) and
//! [`AuthProvider`](gigledger_core::auth::AuthProvider), so services never see
//! the wire format.
//!
//! Column names are snake_case on the wire and camelCase in the domain; the
//! [`wire`] module converts top-level keys in both directions.

mod client;
mod error;
pub mod types;
pub mod wire;

pub use client::RemoteClient;
pub use error::{RemoteStoreError, Result};
