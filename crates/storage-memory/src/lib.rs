//! In-process implementations of the GigLedger collaborator contracts.
//!
//! [`MemoryStore`] keeps JSON records per collection and [`MemoryAuth`]
//! keeps argon2-hashed accounts, both for the lifetime of the process.
//! The server falls back to them when no remote backend is configured.
//!
//! ```text
//!   gigledger-core (DataStore, AuthProvider)
//!            │
//!            ▼
//!   storage-memory (this crate)
//! ```

pub mod auth;
pub mod store;

pub use auth::MemoryAuth;
pub use store::MemoryStore;
