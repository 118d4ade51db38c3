//! Immutable domain values shared by the engine, storage and binaries.

pub mod domain;
pub mod error;
pub mod filters;
pub mod protocol;
pub mod taxonomy;
