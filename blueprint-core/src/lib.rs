//! Blueprint Core
//!
//! Core types shared by the blueprint compiler and its surfaces.
//!
//! This crate contains:
//! - Domain types: entities, blueprint selections, pipeline plans, domain scopes
//!   and the stored records the compiler reads
//! - DTOs: request/response shapes for the orchestrator API

pub mod domain;
pub mod dto;
