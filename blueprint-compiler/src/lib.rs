//! Blueprint Compiler
//!
//! Turns a declarative blueprint selection (connection, scope references,
//! requested entities, sync policy) into an ordered pipeline plan and the
//! domain scopes the plan populates.
//!
//! The engine is connector-agnostic: each connector contributes a
//! [`Connector`] policy (subtask catalog, option builder, chaining rules and
//! domain mapping) and [`PlanCompiler`] runs the same resolve → filter →
//! assemble → emit sequence for all of them.

pub mod assembler;
pub mod catalog;
pub mod chain;
pub mod compiler;
pub mod connector;
pub mod connectors;
pub mod emitter;
pub mod error;
pub mod idgen;
pub mod planner;
pub mod registry;
pub mod resolver;
pub mod store;

pub use compiler::PlanCompiler;
pub use connector::{Connector, ScopeContext, ToolScope};
pub use error::{CompileError, ErrorKind};
pub use planner::BlueprintPlanner;
pub use registry::{ConnectorRegistry, PlanSource};
pub use store::{MemoryStore, ScopeStore, StoreError};
