//! Plugin API Handlers

use axum::{Json, extract::State};
use blueprint_core::dto::plugin::PluginSummary;

use crate::api::AppState;
use crate::service::compile_service;

/// GET /plugins
/// List the connectors the compiler can plan for
pub async fn list_plugins(State(state): State<AppState>) -> Json<Vec<PluginSummary>> {
    tracing::debug!("Listing plugins");
    Json(compile_service::list_plugins(&state.registry))
}
