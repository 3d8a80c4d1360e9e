//! Builders to construct schedulers and stores from configuration.

pub mod scheduler_builder;

pub use scheduler_builder::{build_scheduler, build_store, restore_scheduler};
