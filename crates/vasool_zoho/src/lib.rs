// --- File: crates/vasool_zoho/src/lib.rs ---
// Declare modules within this crate
pub mod callback;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod initiator;
#[cfg(test)]
mod initiator_test;
pub mod logic;
pub mod navigator;
pub mod routes;
pub mod service;
pub mod status;
#[cfg(test)]
mod test_support;

// Re-export for the app shell
pub use callback::{CallbackHandler, CallbackOutcome, CallbackParams, CallbackResult, CallbackStatus};
pub use error::ZohoError;
pub use handlers::ZohoState;
pub use initiator::{ConnectOutcome, ConnectPhase, ConnectionInitiator};
pub use navigator::ResponseNavigator;
pub use routes::routes;
pub use service::{SharedZohoService, ZohoIntegrationService};
pub use status::StatusReader;
