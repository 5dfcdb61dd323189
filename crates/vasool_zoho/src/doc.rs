// --- File: crates/vasool_zoho/src/doc.rs ---
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::callback::{CallbackOutcome, CallbackParams, CallbackStatus, ScheduledRedirect};
use crate::initiator::{ConnectOutcome, ConnectPhase};
use crate::logic::{AuthUrlResponse, CallbackExchangeRequest, DisconnectResponse};
use vasool_common::models::{
    ConnectionState, IntegrationKind, IntegrationStatus, OAuthClientCredentials,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::connect_handler,
        crate::handlers::demo_handler,
        crate::handlers::abandon_handler,
        crate::handlers::disconnect_handler,
        crate::handlers::phase_handler,
        crate::handlers::status_handler,
        crate::handlers::callback_handler
    ),
    components(
        schemas(
            ConnectOutcome, ConnectPhase,
            CallbackOutcome, CallbackParams, CallbackStatus, ScheduledRedirect,
            ConnectionState, IntegrationKind, IntegrationStatus, OAuthClientCredentials,
            // Backend wire types, for reference
            AuthUrlResponse, CallbackExchangeRequest, DisconnectResponse
        )
    ),
    tags(
        (name = "Zoho Books", description = "Zoho Books OAuth connection workflow")
    )
)]
pub struct ZohoApiDoc;
