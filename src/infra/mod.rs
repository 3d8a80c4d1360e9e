//! Infrastructure adapters for snapshot persistence.

pub mod store;

pub use store::{InMemoryStore, JsonlStore};
