//! Contract with the backing data store.
//!
//! The store is an external collaborator holding plain JSON records per
//! [`Collection`]. Services talk to it through [`DataStore`] and convert to
//! typed records with the helpers in [`records`].

pub mod records;
pub mod store_model;
pub mod store_traits;

pub use records::Record;
pub use store_model::{compare_values, Collection, Filter, ListQuery, SortOrder};
pub use store_traits::DataStore;
