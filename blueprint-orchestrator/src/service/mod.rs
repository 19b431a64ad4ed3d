//! Service Module
//!
//! Business logic layer for the orchestrator.
//! Services load what a request needs from the repositories and hand it to
//! the compiler.

pub mod compile;

// Re-export for convenience
pub use compile as compile_service;
