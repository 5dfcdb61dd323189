// --- File: crates/services/vasool_app/src/dashboard.rs ---

// Integrations listing and the dashboard endpoint the callback page
// navigates to once a connection is completed.

use axum::{extract::State, response::Response, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use vasool_common::models::{ConnectionState, IntegrationCatalogEntry, IntegrationKind};
use vasool_common::{auth_error, handle_json_result, VasoolError};

use crate::app_state::AppState;

/// One catalog entry with the signed-in account's connection state.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationView {
    #[serde(flatten)]
    pub entry: IntegrationCatalogEntry,
    /// Only set for implemented integrations whose status could be read.
    pub connection: Option<ConnectionState>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationsResponse {
    pub integrations: Vec<IntegrationView>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub connections: Vec<ConnectionState>,
}

/// Lists every integration. Status is read from the backend when signed in;
/// a failed read leaves `connection` empty instead of failing the listing.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/integrations",
    responses((status = 200, description = "Integration catalog", body = IntegrationsResponse)),
    tag = "Dashboard"
))]
pub async fn integrations_handler(State(state): State<Arc<AppState>>) -> Json<IntegrationsResponse> {
    let connections = if state.session.is_authenticated() {
        read_connections(&state).await.unwrap_or_else(|e| {
            warn!("Integration status unavailable: {}", e);
            Vec::new()
        })
    } else {
        Vec::new()
    };

    let integrations = IntegrationKind::catalog()
        .into_iter()
        .map(|entry| {
            let connection = connections
                .iter()
                .find(|c| c.kind.id() == entry.id)
                .cloned();
            IntegrationView { entry, connection }
        })
        .collect();

    Json(IntegrationsResponse { integrations })
}

/// Re-queries the backend status for every enabled integration.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Fresh connection states", body = DashboardResponse),
        (status = 401, description = "Not signed in")
    ),
    tag = "Dashboard"
))]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, Response> {
    if !state.session.is_authenticated() {
        return handle_json_result(Err(auth_error("Not authenticated")));
    }
    let result = read_connections(&state)
        .await
        .map(|connections| DashboardResponse { connections });
    handle_json_result(result)
}

#[cfg(feature = "zoho")]
async fn read_connections(state: &AppState) -> Result<Vec<ConnectionState>, VasoolError> {
    let mut connections = Vec::new();
    if let Some(zoho) = &state.zoho_state {
        connections.push(zoho.status.refresh().await?);
    }
    Ok(connections)
}

#[cfg(not(feature = "zoho"))]
async fn read_connections(_state: &AppState) -> Result<Vec<ConnectionState>, VasoolError> {
    Ok(Vec::new())
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/integrations", get(integrations_handler))
        .route("/dashboard", get(dashboard_handler))
        .with_state(state)
}
