// --- File: crates/services/vasool_app/src/service_factory.rs ---
//! Service factory for the application shell.
//!
//! Builds the integration services once at startup, honouring both the
//! compile-time features and the runtime `use_*` flags.
use std::sync::Arc;
use vasool_common::BackendClient;
use vasool_config::AppConfig;

#[allow(unused_imports)] // only used with certain features
use tracing::{info, warn};

#[cfg(feature = "zoho")]
use {
    vasool_common::is_zoho_enabled,
    vasool_zoho::{SharedZohoService, ZohoIntegrationService},
};

pub struct VasoolServiceFactory {
    #[cfg(feature = "zoho")]
    zoho_service: Option<SharedZohoService>,
}

impl VasoolServiceFactory {
    /// Create a new service factory. Integrations disabled in `config` get no service.
    #[allow(unused_variables)]
    pub fn new(config: Arc<AppConfig>, backend: BackendClient) -> Self {
        #[cfg(feature = "zoho")]
        let zoho_service: Option<SharedZohoService> = if is_zoho_enabled(&config) {
            info!("Zoho Books integration enabled");
            Some(Arc::new(ZohoIntegrationService::new(backend.clone())))
        } else {
            warn!("Zoho Books integration disabled by configuration");
            None
        };

        Self {
            #[cfg(feature = "zoho")]
            zoho_service,
        }
    }

    /// Factory with a pre-built Zoho service, for tests and embedding.
    #[cfg(feature = "zoho")]
    pub fn with_zoho_service(service: Option<SharedZohoService>) -> Self {
        Self {
            zoho_service: service,
        }
    }

    #[cfg(feature = "zoho")]
    pub fn zoho_service(&self) -> Option<SharedZohoService> {
        self.zoho_service.clone()
    }
}
