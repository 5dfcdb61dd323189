// --- File: crates/vasool_zoho/src/service.rs ---
use std::sync::Arc;
use vasool_common::models::{DemoConnectionResult, IntegrationStatus, OAuthClientCredentials};
use vasool_common::services::{BoxFuture, CallbackExchange, IntegrationService};
use vasool_common::BackendClient;

use crate::error::ZohoError;
use crate::logic;

/// Integration service as seen by the Zoho controllers.
pub type SharedZohoService = Arc<dyn IntegrationService<Error = ZohoError>>;

/// Zoho Books implementation of [`IntegrationService`] backed by the REST API.
pub struct ZohoIntegrationService {
    backend: BackendClient,
}

impl ZohoIntegrationService {
    /// Create a new Zoho integration service
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

impl IntegrationService for ZohoIntegrationService {
    type Error = ZohoError;

    fn authorization_url(&self, token: &str) -> BoxFuture<'_, String, Self::Error> {
        let token = token.to_string();
        Box::pin(async move { logic::fetch_auth_url(&self.backend, &token).await })
    }

    fn user_oauth_setup(
        &self,
        token: &str,
        credentials: &OAuthClientCredentials,
    ) -> BoxFuture<'_, String, Self::Error> {
        let token = token.to_string();
        let credentials = credentials.clone();
        Box::pin(async move {
            logic::submit_user_oauth_setup(&self.backend, &token, &credentials).await
        })
    }

    fn demo_connect(&self, token: &str) -> BoxFuture<'_, DemoConnectionResult, Self::Error> {
        let token = token.to_string();
        Box::pin(async move { logic::demo_connect(&self.backend, &token).await })
    }

    fn exchange_callback(
        &self,
        token: &str,
        code: &str,
        state: &str,
    ) -> BoxFuture<'_, CallbackExchange, Self::Error> {
        let token = token.to_string();
        let code = code.to_string();
        let state = state.to_string();
        Box::pin(async move { logic::exchange_callback(&self.backend, &token, &code, &state).await })
    }

    fn status(&self, token: &str) -> BoxFuture<'_, IntegrationStatus, Self::Error> {
        let token = token.to_string();
        Box::pin(async move { logic::fetch_status(&self.backend, &token).await })
    }

    fn disconnect(&self, token: &str) -> BoxFuture<'_, (), Self::Error> {
        let token = token.to_string();
        Box::pin(async move { logic::disconnect(&self.backend, &token).await })
    }
}
