//! Test fixtures for the Zoho Books wire-contract tests.

#![allow(dead_code)]

use reqwest::Client;
use std::sync::Arc;
use vasool_common::{BackendClient, Session};
use vasool_config::ZohoConfig;
use vasool_zoho::{SharedZohoService, ZohoIntegrationService, ZohoState};
use wiremock::MockServer;

pub const TOKEN: &str = "jwt-test-token";

pub const AUTH_URL: &str =
    "https://accounts.zoho.com/oauth/v2/auth?scope=ZohoBooks.fullaccess.all&client_id=1000.X&response_type=code&access_type=offline&redirect_uri=http%3A%2F%2F127.0.0.1%3A3000%2Fzoho%2Fcallback&state=abc123";

/// Backend client pointed at the mock server's `/api` prefix.
pub fn backend_for(server: &MockServer) -> BackendClient {
    BackendClient::with_client(Client::new(), format!("{}/api", server.uri()))
}

/// Controllers wired to the mock server, signed in with [`TOKEN`].
pub fn state_for(server: &MockServer) -> (ZohoState, Arc<Session>) {
    let session = Arc::new(Session::in_memory(Some(TOKEN)));
    let service: SharedZohoService = Arc::new(ZohoIntegrationService::new(backend_for(server)));
    let state = ZohoState::new(service, session.clone(), ZohoConfig::default());
    (state, session)
}

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}
