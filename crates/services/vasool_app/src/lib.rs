// --- File: crates/services/vasool_app/src/lib.rs ---
pub mod app_state;
pub mod dashboard;
pub mod doc;
pub mod service_factory;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use vasool_common::CommonState;

use crate::app_state::AppState;

/// Assembles the shell router: session routes, the dashboard, and every
/// enabled integration.
pub fn build_router(state: Arc<AppState>) -> Router {
    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut common = CommonState::new(state.auth.clone());
    #[cfg(feature = "zoho")]
    {
        if let Some(zoho) = &state.zoho_state {
            // Connection state and a pending config choice belong to the
            // account that produced them
            let zoho = zoho.clone();
            common = common.with_sign_out_hook(Arc::new(move || {
                zoho.status.clear();
                zoho.initiator.reset();
            }));
        }
    }

    #[allow(unused_mut)]
    let mut router = Router::new()
        .merge(vasool_common::routes(Arc::new(common)))
        .merge(dashboard::routes(state.clone()));
    #[cfg(feature = "zoho")]
    {
        if let Some(zoho) = &state.zoho_state {
            router = router.merge(vasool_zoho::routes(
                zoho.clone(),
                &state.zoho_callback_path(),
            ));
        }
    }

    router.layer(TraceLayer::new_for_http())
}
