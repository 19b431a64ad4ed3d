//! Core domain types
//!
//! This module contains the structures shared by the compiler (which produces
//! plans and domain scopes), the orchestrator (which stores the inputs) and
//! the client/CLI (which send requests and render results).

pub mod blueprint;
pub mod entity;
pub mod pipeline;
pub mod scope;
pub mod source;
