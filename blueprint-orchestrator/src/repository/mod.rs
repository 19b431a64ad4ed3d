//! Repository Module
//!
//! Read access to the data-source tables the compiler plans from.
//! Each repository handles database operations for a specific record type.

pub mod connection;
pub mod scope;
pub mod scope_config;

// Re-export for convenience
pub use connection as connection_repository;
pub use scope as scope_repository;
pub use scope_config as scope_config_repository;
