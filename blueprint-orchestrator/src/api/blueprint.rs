//! Blueprint API Handlers
//!
//! HTTP endpoints that compile blueprints into pipeline plans.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use blueprint_core::domain::blueprint::BlueprintSettings;
use blueprint_core::dto::compile::{CompileRequest, CompileResponse};

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::compile_service;

/// POST /blueprint/compile
/// Compile the scopes of one connection
pub async fn compile_blueprint(
    State(state): State<AppState>,
    payload: Result<Json<CompileRequest>, JsonRejection>,
) -> ApiResult<Json<CompileResponse>> {
    let Json(req) = payload?;
    tracing::info!(
        plugin = %req.plugin,
        connection_id = req.connection_id,
        scopes = req.scopes.len(),
        "Compiling blueprint"
    );

    let response = compile_service::compile(&state.pool, &state.registry, req).await?;
    Ok(Json(response))
}

/// POST /blueprint/plan
/// Compile every connection of a blueprint into one plan
pub async fn plan_blueprint(
    State(state): State<AppState>,
    payload: Result<Json<BlueprintSettings>, JsonRejection>,
) -> ApiResult<Json<CompileResponse>> {
    let Json(settings) = payload?;
    tracing::info!(
        connections = settings.connections.len(),
        "Planning blueprint"
    );

    let response = compile_service::plan(&state.pool, &state.registry, settings).await?;
    Ok(Json(response))
}
