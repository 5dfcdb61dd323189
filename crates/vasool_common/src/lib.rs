// --- File: crates/vasool_common/src/lib.rs ---

pub mod auth; // Sign-in collaborator, sole writer of the session token
pub mod error; // Error handling
pub mod features; // Feature flag handling
pub mod handlers; // HTTP request handlers
pub mod http; // HTTP utilities and the backend client
pub mod logging; // Logging utilities
pub mod models; // Data structures and models
pub mod routes; // Route definitions
pub mod services; // Service abstractions
pub mod session; // Persisted session token

// Re-export the routes function to be used by the app shell
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    auth_error, config_error, conflict, external_service_error, internal_error,
    validation_error, Context, HttpStatusCode, VasoolError,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, extract_detail, ApiFailure, BackendClient, BACKEND_SERVICE_NAME},
    handle_json_result, map_json_error, IntoHttpResponse,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_from_config, init_with_level, log_error, log_result};

pub use auth::AuthClient;
pub use handlers::{CommonState, SignOutHook};
pub use services::{BoxFuture, CallbackExchange, IntegrationService, Navigator};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

#[cfg(feature = "mocks")]
pub use services::MockNavigator;

// Re-export feature flag handling utilities for easier access
#[cfg(feature = "zoho")]
pub use features::is_zoho_enabled;
