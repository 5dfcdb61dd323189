// --- File: crates/vasool_zoho/src/initiator.rs ---
//! Connection Initiator.
//!
//! Drives one connect attempt: ask the backend for an authorization URL (with
//! or without the user's own OAuth app), redirect the top-level context to it,
//! or fall back to offering demo mode when the backend has no OAuth app.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};
use uuid::Uuid;
use vasool_common::models::{ConnectionState, IntegrationKind, OAuthClientCredentials};
use vasool_common::{Navigator, Session};

use crate::error::ZohoError;
use crate::service::SharedZohoService;
use crate::status::StatusReader;

/// Where the initiator currently stands.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ConnectPhase {
    Idle,
    Requesting,
    /// The backend has no OAuth app; waiting for demo or abandon.
    AwaitingConfigChoice {
        detail: Option<String>,
    },
    Redirecting,
    DemoConnecting,
}

impl ConnectPhase {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectPhase::Idle => "idle",
            ConnectPhase::Requesting => "requesting",
            ConnectPhase::AwaitingConfigChoice { .. } => "awaiting_config_choice",
            ConnectPhase::Redirecting => "redirecting",
            ConnectPhase::DemoConnecting => "demo_connecting",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ConnectPhase::Requesting | ConnectPhase::Redirecting | ConnectPhase::DemoConnecting
        )
    }
}

/// Result of a successful `connect` call.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConnectOutcome {
    /// The navigator was sent to this exact URL.
    Redirected { auth_url: String },
    /// Demo mode or abandon must be chosen next.
    ConfigChoiceRequired { detail: Option<String> },
}

/// The phase together with the session generation it was reached in.
struct PhaseSlot {
    phase: ConnectPhase,
    generation: u64,
}

impl PhaseSlot {
    /// A pending config choice belongs to the session that was offered it.
    fn resolve(&self, generation: u64) -> ConnectPhase {
        match &self.phase {
            ConnectPhase::AwaitingConfigChoice { .. } if self.generation != generation => {
                ConnectPhase::Idle
            }
            phase => phase.clone(),
        }
    }
}

/// Holds a busy phase and restores the settled phase (Idle unless told
/// otherwise) when dropped.
struct BusyGuard<'a> {
    slot: &'a Mutex<PhaseSlot>,
    generation: u64,
    settle_to: ConnectPhase,
}

impl BusyGuard<'_> {
    fn set(&self, phase: ConnectPhase) {
        lock(self.slot).phase = phase;
    }

    fn settle_to(&mut self, phase: ConnectPhase) {
        self.settle_to = phase;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let settled = std::mem::replace(&mut self.settle_to, ConnectPhase::Idle);
        *lock(self.slot) = PhaseSlot {
            phase: settled,
            generation: self.generation,
        };
    }
}

fn lock(slot: &Mutex<PhaseSlot>) -> MutexGuard<'_, PhaseSlot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct ConnectionInitiator {
    service: SharedZohoService,
    session: Arc<Session>,
    status: Arc<StatusReader>,
    slot: Mutex<PhaseSlot>,
}

impl ConnectionInitiator {
    pub fn new(service: SharedZohoService, session: Arc<Session>, status: Arc<StatusReader>) -> Self {
        Self {
            service,
            session,
            status,
            slot: Mutex::new(PhaseSlot {
                phase: ConnectPhase::Idle,
                generation: 0,
            }),
        }
    }

    pub fn phase(&self) -> ConnectPhase {
        lock(&self.slot).resolve(self.session.generation())
    }

    /// Drops a pending config choice. Called on sign-out; an attempt still in
    /// flight keeps its busy phase until its guard settles.
    pub fn reset(&self) {
        let mut slot = lock(&self.slot);
        if !slot.phase.is_busy() {
            slot.phase = ConnectPhase::Idle;
        }
    }

    /// Starts a connection for `kind`.
    ///
    /// With `credentials` the user's own OAuth app is submitted, otherwise the
    /// backend's configured app is used.
    pub async fn connect(
        &self,
        kind: IntegrationKind,
        credentials: Option<OAuthClientCredentials>,
        navigator: &dyn Navigator,
    ) -> Result<ConnectOutcome, ZohoError> {
        if !kind.is_available() {
            return Err(ZohoError::NotAvailable(kind));
        }
        let token = self.require_token()?;
        let mut guard = self.enter(|phase| !phase.is_busy(), ConnectPhase::Requesting)?;
        let credentials = credentials
            .map(|c| c.validate().map_err(|e| ZohoError::Validation(bare_message(e))))
            .transpose()?;

        let flow = Uuid::new_v4();
        info!(%flow, custom_app = credentials.is_some(), "Starting {} connection", kind.display_name());

        let requested = match &credentials {
            Some(credentials) => self.service.user_oauth_setup(&token, credentials).await,
            None => self.service.authorization_url(&token).await,
        };

        match requested {
            Ok(auth_url) => {
                guard.set(ConnectPhase::Redirecting);
                info!(%flow, "Redirecting top-level context to Zoho consent page");
                navigator.redirect_top_level(&auth_url);
                Ok(ConnectOutcome::Redirected { auth_url })
            }
            // Only the backend's own app can be "not configured".
            Err(ZohoError::ConfigMissing(detail)) if credentials.is_none() => {
                info!(%flow, "Zoho OAuth not configured, offering demo mode");
                guard.settle_to(ConnectPhase::AwaitingConfigChoice {
                    detail: detail.clone(),
                });
                Ok(ConnectOutcome::ConfigChoiceRequired { detail })
            }
            Err(e) => {
                warn!(%flow, "Zoho connection attempt failed: {}", e);
                Err(e)
            }
        }
    }

    /// Connects in demo mode after the backend reported no OAuth app.
    ///
    /// The returned state comes from a fresh status query, never from the
    /// demo response itself.
    pub async fn choose_demo(&self) -> Result<ConnectionState, ZohoError> {
        let token = self.require_token()?;
        let _guard = self.enter(
            |phase| matches!(phase, ConnectPhase::AwaitingConfigChoice { .. }),
            ConnectPhase::DemoConnecting,
        )?;

        let result = self.service.demo_connect(&token).await?;
        if !result.success {
            return Err(ZohoError::Backend {
                status: 200,
                detail: Some("Demo connection was not accepted".to_string()),
            });
        }
        info!("Demo connection accepted, refreshing status");
        self.status.refresh().await
    }

    /// Leaves the config choice without connecting.
    pub fn abandon(&self) -> Result<(), ZohoError> {
        let mut slot = lock(&self.slot);
        match slot.resolve(self.session.generation()) {
            ConnectPhase::AwaitingConfigChoice { .. } => {
                slot.phase = ConnectPhase::Idle;
                Ok(())
            }
            other => Err(ZohoError::InvalidState(other.name())),
        }
    }

    /// Disconnects Zoho Books and returns the refreshed state.
    pub async fn disconnect(&self) -> Result<ConnectionState, ZohoError> {
        let token = self.require_token()?;
        if lock(&self.slot).phase.is_busy() {
            return Err(ZohoError::InProgress);
        }
        self.service.disconnect(&token).await?;
        info!("Zoho Books disconnected, refreshing status");
        self.status.refresh().await
    }

    fn require_token(&self) -> Result<String, ZohoError> {
        self.session
            .token()
            .ok_or_else(|| ZohoError::Auth("Not authenticated".to_string()))
    }

    /// Moves into `busy` when `allowed` accepts the current phase.
    fn enter(
        &self,
        allowed: impl Fn(&ConnectPhase) -> bool,
        busy: ConnectPhase,
    ) -> Result<BusyGuard<'_>, ZohoError> {
        let generation = self.session.generation();
        let mut slot = lock(&self.slot);
        let current = slot.resolve(generation);
        if !allowed(&current) {
            return Err(if current.is_busy() {
                ZohoError::InProgress
            } else {
                ZohoError::InvalidState(current.name())
            });
        }
        *slot = PhaseSlot {
            phase: busy,
            generation,
        };
        Ok(BusyGuard {
            slot: &self.slot,
            generation,
            settle_to: ConnectPhase::Idle,
        })
    }
}

fn bare_message(err: vasool_common::VasoolError) -> String {
    match err {
        vasool_common::VasoolError::ValidationError(msg) => msg,
        other => other.to_string(),
    }
}
