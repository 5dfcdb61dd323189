// --- File: crates/services/vasool_app/src/app_state.rs ---
use std::sync::Arc;
use vasool_common::{AuthClient, BackendClient, Session};
use vasool_config::AppConfig;

use crate::service_factory::VasoolServiceFactory;

#[cfg(feature = "zoho")]
use vasool_zoho::ZohoState;

/// State shared by the shell's own routes and handed to the feature routers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// The one session every component reads its bearer token from.
    pub session: Arc<Session>,
    /// Sole writer of the session token.
    pub auth: AuthClient,
    pub service_factory: Arc<VasoolServiceFactory>,

    /// Zoho Books controllers, present when the integration is enabled.
    #[cfg(feature = "zoho")]
    pub zoho_state: Option<Arc<ZohoState>>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        session: Arc<Session>,
        backend: BackendClient,
        service_factory: Arc<VasoolServiceFactory>,
    ) -> Self {
        #[cfg(feature = "zoho")]
        let zoho_state = service_factory.zoho_service().map(|service| {
            Arc::new(ZohoState::new(
                service,
                session.clone(),
                config.zoho.clone().unwrap_or_default(),
            ))
        });

        Self {
            auth: AuthClient::new(backend, session.clone()),
            config,
            session,
            service_factory,
            #[cfg(feature = "zoho")]
            zoho_state,
        }
    }

    /// Path the third party redirects back to after consent.
    #[cfg(feature = "zoho")]
    pub fn zoho_callback_path(&self) -> String {
        self.config
            .zoho
            .as_ref()
            .map(|zoho| zoho.callback_path.clone())
            .unwrap_or_else(|| vasool_config::ZohoConfig::default().callback_path)
    }
}
