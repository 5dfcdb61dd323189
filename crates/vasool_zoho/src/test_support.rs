// --- File: crates/vasool_zoho/src/test_support.rs ---
// In-memory stand-in for the backend used by the controller unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use vasool_common::models::{DemoConnectionResult, IntegrationStatus, OAuthClientCredentials};
use vasool_common::services::{BoxFuture, CallbackExchange, IntegrationService};
use vasool_common::Session;
use vasool_config::ZohoConfig;

use crate::error::ZohoError;
use crate::handlers::ZohoState;
use crate::service::SharedZohoService;

pub const AUTH_URL: &str =
    "https://accounts.zoho.com/oauth/v2/auth?scope=ZohoBooks.fullaccess.all&client_id=1000.X&state=abc123";

type Reply<T> = Box<dyn Fn() -> Result<T, ZohoError> + Send + Sync>;

pub struct FakeService {
    auth_url: Reply<String>,
    user_setup: Reply<String>,
    demo: Reply<DemoConnectionResult>,
    exchange: Reply<CallbackExchange>,
    status_fails: bool,
    connected: AtomicBool,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<(String, String)>>,
    credentials: Mutex<Option<OAuthClientCredentials>>,
    exchanged: Mutex<Option<(String, String)>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            auth_url: Box::new(|| Ok(AUTH_URL.to_string())),
            user_setup: Box::new(|| Ok(AUTH_URL.to_string())),
            demo: Box::new(|| Ok(DemoConnectionResult { success: true })),
            exchange: Box::new(|| {
                Ok(CallbackExchange {
                    success: true,
                    detail: None,
                })
            }),
            status_fails: false,
            connected: AtomicBool::new(false),
            gate: None,
            calls: Mutex::new(Vec::new()),
            credentials: Mutex::new(None),
            exchanged: Mutex::new(None),
        }
    }

    pub fn auth_url_reply(
        mut self,
        reply: impl Fn() -> Result<String, ZohoError> + Send + Sync + 'static,
    ) -> Self {
        self.auth_url = Box::new(reply);
        self
    }

    pub fn user_setup_reply(
        mut self,
        reply: impl Fn() -> Result<String, ZohoError> + Send + Sync + 'static,
    ) -> Self {
        self.user_setup = Box::new(reply);
        self
    }

    pub fn demo_reply(
        mut self,
        reply: impl Fn() -> Result<DemoConnectionResult, ZohoError> + Send + Sync + 'static,
    ) -> Self {
        self.demo = Box::new(reply);
        self
    }

    pub fn exchange_reply(
        mut self,
        reply: impl Fn() -> Result<CallbackExchange, ZohoError> + Send + Sync + 'static,
    ) -> Self {
        self.exchange = Box::new(reply);
        self
    }

    pub fn failing_status(mut self) -> Self {
        self.status_fails = true;
        self
    }

    pub fn connected(self) -> Self {
        self.connected.store(true, Ordering::SeqCst);
        self
    }

    /// Makes the authorization URL request wait until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|c| c.iter().map(|(op, _)| op.clone()).collect())
            .unwrap_or_default()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|c| c.iter().map(|(_, token)| token.clone()).collect())
            .unwrap_or_default()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == op).count()
    }

    pub fn submitted_credentials(&self) -> Option<OAuthClientCredentials> {
        self.credentials.lock().ok().and_then(|c| c.clone())
    }

    pub fn exchanged(&self) -> Option<(String, String)> {
        self.exchanged.lock().ok().and_then(|e| e.clone())
    }

    fn record(&self, op: &str, token: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((op.to_string(), token.to_string()));
        }
    }
}

impl IntegrationService for FakeService {
    type Error = ZohoError;

    fn authorization_url(&self, token: &str) -> BoxFuture<'_, String, Self::Error> {
        self.record("auth_url", token);
        Box::pin(async move {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.auth_url)()
        })
    }

    fn user_oauth_setup(
        &self,
        token: &str,
        credentials: &OAuthClientCredentials,
    ) -> BoxFuture<'_, String, Self::Error> {
        self.record("user_oauth_setup", token);
        if let Ok(mut slot) = self.credentials.lock() {
            *slot = Some(credentials.clone());
        }
        Box::pin(async move { (self.user_setup)() })
    }

    fn demo_connect(&self, token: &str) -> BoxFuture<'_, DemoConnectionResult, Self::Error> {
        self.record("demo_connect", token);
        Box::pin(async move {
            let result = (self.demo)()?;
            if result.success {
                self.connected.store(true, Ordering::SeqCst);
            }
            Ok(result)
        })
    }

    fn exchange_callback(
        &self,
        token: &str,
        code: &str,
        state: &str,
    ) -> BoxFuture<'_, CallbackExchange, Self::Error> {
        self.record("callback", token);
        if let Ok(mut slot) = self.exchanged.lock() {
            *slot = Some((code.to_string(), state.to_string()));
        }
        Box::pin(async move {
            let result = (self.exchange)()?;
            if result.success {
                self.connected.store(true, Ordering::SeqCst);
            }
            Ok(result)
        })
    }

    fn status(&self, token: &str) -> BoxFuture<'_, IntegrationStatus, Self::Error> {
        self.record("status", token);
        Box::pin(async move {
            if self.status_fails {
                return Err(ZohoError::Backend {
                    status: 500,
                    detail: Some("status unavailable".to_string()),
                });
            }
            let connected = self.connected.load(Ordering::SeqCst);
            Ok(IntegrationStatus {
                zohobooks_connected: connected,
                zohobooks_email: connected.then(|| "books@acme.in".to_string()),
                last_sync: None,
            })
        })
    }

    fn disconnect(&self, token: &str) -> BoxFuture<'_, (), Self::Error> {
        self.record("disconnect", token);
        Box::pin(async move {
            self.connected.store(false, Ordering::SeqCst);
            Ok(())
        })
    }
}

pub fn config_missing() -> ZohoError {
    ZohoError::ConfigMissing(Some("Zoho OAuth credentials not configured".to_string()))
}

/// Controllers wired to `fake`, signed in as `tok-1` unless `token` says otherwise.
pub fn state_with(fake: Arc<FakeService>, token: Option<&str>) -> (ZohoState, Arc<Session>) {
    let session = Arc::new(Session::in_memory(token));
    let service: SharedZohoService = fake;
    let state = ZohoState::new(service, session.clone(), ZohoConfig::default());
    (state, session)
}
