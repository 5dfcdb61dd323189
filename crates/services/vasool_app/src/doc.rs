// --- File: crates/services/vasool_app/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::dashboard::{DashboardResponse, IntegrationView, IntegrationsResponse};
use vasool_common::auth::{LoginRequest, SignupRequest, UserProfile};
use vasool_common::handlers::{HealthResponse, SessionResponse};
use vasool_common::models::{IntegrationCatalogEntry, IntegrationCategory};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vasool Client Shell",
        version = "0.1.0",
        description = "Local endpoints of the Vasool client",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        vasool_common::handlers::health_handler,
        vasool_common::handlers::login_handler,
        vasool_common::handlers::signup_handler,
        vasool_common::handlers::logout_handler,
        vasool_common::handlers::me_handler,
        crate::dashboard::integrations_handler,
        crate::dashboard::dashboard_handler
    ),
    components(schemas(
        HealthResponse, SessionResponse, LoginRequest, SignupRequest, UserProfile,
        IntegrationsResponse, IntegrationView, IntegrationCatalogEntry, IntegrationCategory,
        DashboardResponse
    )),
    tags(
        (name = "Session", description = "Sign-in state of the local shell"),
        (name = "Dashboard", description = "Integration catalog and connection states")
    )
)]
pub struct VasoolApiDoc;

/// The shell document merged with the docs of every enabled integration.
pub fn merged_openapi() -> utoipa::openapi::OpenApi {
    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut openapi_doc = VasoolApiDoc::openapi();
    #[cfg(feature = "zoho")]
    openapi_doc.merge(vasool_zoho::doc::ZohoApiDoc::openapi());
    openapi_doc
}
