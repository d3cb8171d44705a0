//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use fuelsplit_core::domain::Session;
use fuelsplit_core::ports::PortError;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_sessions_handler,
        append_session_handler,
        clear_sessions_handler,
        health_handler,
        version_handler,
    ),
    components(
        schemas(AppendSessionResponse, ClearHistoryResponse, HealthResponse, VersionResponse)
    ),
    tags(
        (name = "FuelSplit History API", description = "CRUD endpoints for persisted fuel-split sessions.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// The response payload sent after successfully appending a session.
#[derive(Serialize, ToSchema)]
pub struct AppendSessionResponse {
    ok: bool,
    id: Uuid,
}

/// The response payload sent after clearing the history.
#[derive(Serialize, ToSchema)]
pub struct ClearHistoryResponse {
    ok: bool,
}

/// Service liveness report.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    ok: bool,
    service: &'static str,
    time: DateTime<Utc>,
}

/// Build identification for deployment checks.
#[derive(Serialize, ToSchema)]
pub struct VersionResponse {
    ok: bool,
    message: &'static str,
    time: DateTime<Utc>,
}

const SERVICE_NAME: &str = "fuelsplit-backend";

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the persisted sessions, newest first.
#[utoipa::path(
    get,
    path = "/api/sessions",
    responses(
        (status = 200, description = "The stored history entries, newest first"),
        (status = 500, description = "The history store could not be read")
    )
)]
pub async fn list_sessions_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.store.list_entries().await {
        Ok(entries) => Ok(Json(entries)),
        Err(e) => {
            error!("Failed to list sessions: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list sessions".to_string(),
            ))
        }
    }
}

/// Append one finalized session to the history.
///
/// The payload is the canonical session record. Sessions that are not
/// finalized (a live preview in two-trip mode) or that carry an unknown
/// schema version are rejected rather than stored.
#[utoipa::path(
    post,
    path = "/api/sessions",
    responses(
        (status = 201, description = "Session stored", body = AppendSessionResponse),
        (status = 422, description = "The session is not finalized or uses an unknown schema"),
        (status = 500, description = "The history store could not be written")
    )
)]
pub async fn append_session_handler(
    State(app_state): State<Arc<AppState>>,
    Json(session): Json<Session>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !session.is_finalized() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Only finalized sessions can be saved".to_string(),
        ));
    }

    match app_state.store.append_session(&session).await {
        Ok(id) => Ok((
            StatusCode::CREATED,
            Json(AppendSessionResponse { ok: true, id }),
        )),
        Err(PortError::Rejected(reason)) => {
            Err((StatusCode::UNPROCESSABLE_ENTITY, reason))
        }
        Err(e) => {
            error!("Failed to append session: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save session".to_string(),
            ))
        }
    }
}

/// Delete the entire history.
#[utoipa::path(
    delete,
    path = "/api/sessions",
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse),
        (status = 500, description = "The history store could not be cleared")
    )
)]
pub async fn clear_sessions_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.store.clear_all().await {
        Ok(()) => Ok(Json(ClearHistoryResponse { ok: true })),
        Err(e) => {
            error!("Failed to clear history: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to clear history".to_string(),
            ))
        }
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME,
        time: Utc::now(),
    })
}

/// Reports the running build, useful for verifying a deploy went out.
#[utoipa::path(
    get,
    path = "/api/version",
    responses((status = 200, description = "Running build", body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        ok: true,
        message: concat!("fuelsplit-backend ", env!("CARGO_PKG_VERSION")),
        time: Utc::now(),
    })
}

/// Root banner, kept for quick curl checks against a fresh deploy.
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true, "service": SERVICE_NAME }))
}
