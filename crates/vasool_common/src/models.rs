// --- File: crates/vasool_common/src/models.rs ---

// Data structures shared between the integration crates and the app shell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{validation_error, VasoolError};

/// Accounting systems the client knows about.
///
/// Only Zoho Books is implemented; the others are listed as "Coming soon".
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationKind {
    ZohoBooks,
    QuickBooks,
    XeroBooks,
    Tally,
}

impl IntegrationKind {
    pub const ALL: [IntegrationKind; 4] = [
        IntegrationKind::ZohoBooks,
        IntegrationKind::QuickBooks,
        IntegrationKind::XeroBooks,
        IntegrationKind::Tally,
    ];

    /// Stable identifier used in routes and by the backend.
    pub fn id(&self) -> &'static str {
        match self {
            IntegrationKind::ZohoBooks => "zohobooks",
            IntegrationKind::QuickBooks => "quickbooks",
            IntegrationKind::XeroBooks => "xerobooks",
            IntegrationKind::Tally => "tally",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            IntegrationKind::ZohoBooks => "Zoho Books",
            IntegrationKind::QuickBooks => "QuickBooks",
            IntegrationKind::XeroBooks => "Xero Books",
            IntegrationKind::Tally => "Tally",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, IntegrationKind::ZohoBooks)
    }

    pub fn description(&self) -> &'static str {
        match self {
            IntegrationKind::ZohoBooks => "Connect your Zoho Books account",
            _ => "Coming soon",
        }
    }

    /// Catalog entries for every accounting system, in display order.
    pub fn catalog() -> Vec<IntegrationCatalogEntry> {
        Self::ALL
            .iter()
            .map(|kind| IntegrationCatalogEntry {
                id: kind.id().to_string(),
                name: kind.display_name().to_string(),
                description: kind.description().to_string(),
                category: IntegrationCategory::Accounting,
                available: kind.is_available(),
            })
            .chain(std::iter::once(IntegrationCatalogEntry {
                id: "bank_account".to_string(),
                name: "Connect Bank Account".to_string(),
                description: "Connect your bank account to read statements for reconciliation"
                    .to_string(),
                category: IntegrationCategory::Bank,
                available: false,
            }))
            .collect()
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for IntegrationKind {
    type Err = VasoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| validation_error(format!("Unknown integration: {}", s)))
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationCategory {
    Accounting,
    Bank,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationCatalogEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: IntegrationCategory,
    pub available: bool,
}

/// Client-visible status of one integration for the signed-in account.
///
/// Only ever built from a backend status response.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionState {
    pub kind: IntegrationKind,
    pub connected: bool,
    /// Connected email or organisation, when the backend reports one.
    pub account_label: Option<String>,
    pub last_sync: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// Body of `GET /integrations/status`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationStatus {
    pub zohobooks_connected: bool,
    #[serde(default)]
    pub zohobooks_email: Option<String>,
    #[serde(default)]
    pub last_sync: Option<String>,
}

impl IntegrationStatus {
    /// Projects the backend response onto the Zoho Books connection state.
    pub fn into_zoho_state(self, checked_at: DateTime<Utc>) -> ConnectionState {
        ConnectionState {
            kind: IntegrationKind::ZohoBooks,
            connected: self.zohobooks_connected,
            account_label: self.zohobooks_email.filter(|e| !e.is_empty()),
            last_sync: self.last_sync,
            checked_at,
        }
    }
}

/// OAuth app credentials typed in by the user ("bring your own OAuth app").
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub organization_id: Option<String>,
}

impl OAuthClientCredentials {
    /// Trims the input and rejects empty required fields. An empty
    /// organization id becomes `None`.
    pub fn validate(self) -> Result<Self, VasoolError> {
        let client_id = self.client_id.trim().to_string();
        let client_secret = self.client_secret.trim().to_string();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(validation_error(
                "Please enter both Client ID and Client Secret",
            ));
        }
        let organization_id = self
            .organization_id
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());

        Ok(Self {
            client_id,
            client_secret,
            organization_id,
        })
    }
}

impl fmt::Debug for OAuthClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

/// Result of the simulated demo-mode connection.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoConnectionResult {
    pub success: bool,
}
