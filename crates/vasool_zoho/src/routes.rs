// --- File: crates/vasool_zoho/src/routes.rs ---

use crate::handlers::{
    abandon_handler, callback_handler, connect_handler, demo_handler, disconnect_handler,
    phase_handler, status_handler, ZohoState,
};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all routes for the Zoho Books feature.
///
/// `callback_path` must match the redirect URI registered with Zoho.
pub fn routes(state: Arc<ZohoState>, callback_path: &str) -> Router {
    Router::new()
        .route("/integrations/{kind}/connect", post(connect_handler))
        .route("/integrations/zohobooks/demo", post(demo_handler))
        .route("/integrations/zohobooks/abandon", post(abandon_handler))
        .route("/integrations/zohobooks/phase", get(phase_handler))
        .route("/integrations/zohobooks/status", get(status_handler))
        .route("/integrations/zohobooks", delete(disconnect_handler))
        // The third party redirects the browser here
        .route(callback_path, get(callback_handler))
        .with_state(state)
}
