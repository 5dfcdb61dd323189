// --- File: crates/vasool_zoho/src/status.rs ---
//! Integration Status Reader.
//!
//! Every refresh goes to the backend; the snapshot kept here only serves
//! `current()` and belongs to the session that fetched it.

use chrono::Utc;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use vasool_common::models::ConnectionState;
use vasool_common::Session;

use crate::error::ZohoError;
use crate::service::SharedZohoService;

struct Snapshot {
    generation: u64,
    state: ConnectionState,
}

pub struct StatusReader {
    service: SharedZohoService,
    session: Arc<Session>,
    snapshot: RwLock<Option<Snapshot>>,
}

impl StatusReader {
    pub fn new(service: SharedZohoService, session: Arc<Session>) -> Self {
        Self {
            service,
            session,
            snapshot: RwLock::new(None),
        }
    }

    /// Queries `GET /integrations/status` and stores the result.
    pub async fn refresh(&self) -> Result<ConnectionState, ZohoError> {
        let token = self
            .session
            .token()
            .ok_or_else(|| ZohoError::Auth("Not authenticated".to_string()))?;
        let generation = self.session.generation();

        let status = self.service.status(&token).await?;
        let state = status.into_zoho_state(Utc::now());
        info!(
            "Zoho Books connected: {} ({:?})",
            state.connected, state.account_label
        );

        // A sign-out while the request was in flight makes the answer stale.
        if self.session.generation() == generation {
            if let Ok(mut slot) = self.snapshot.write() {
                *slot = Some(Snapshot {
                    generation,
                    state: state.clone(),
                });
            }
        } else {
            debug!("Session changed during status refresh, snapshot discarded");
        }
        Ok(state)
    }

    /// Last snapshot taken within the current session.
    pub fn current(&self) -> Option<ConnectionState> {
        let generation = self.session.generation();
        let slot = self.snapshot.read().ok()?;
        let state = slot
            .as_ref()
            .filter(|s| s.generation == generation)
            .map(|s| s.state.clone());
        state
    }

    /// Drops the snapshot. Called on logout.
    pub fn clear(&self) {
        if let Ok(mut slot) = self.snapshot.write() {
            *slot = None;
        }
    }
}
