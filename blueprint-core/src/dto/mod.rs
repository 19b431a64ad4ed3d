//! Data Transfer Objects for inter-service communication
//!
//! DTOs exchanged between the orchestrator, the client and the CLI.

pub mod compile;
pub mod plugin;
