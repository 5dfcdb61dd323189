// --- File: crates/vasool_common/src/services.rs ---
//! Service abstractions for the remote backend and for navigation.
//!
//! The integration controllers only talk to these traits, so the HTTP backend
//! and the browser-facing navigation can be swapped for fakes in tests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::models::{DemoConnectionResult, IntegrationStatus, OAuthClientCredentials};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Outcome of the backend's callback exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackExchange {
    pub success: bool,
    pub detail: Option<String>,
}

/// Backend operations for connecting an accounting integration.
///
/// Every method takes the bearer token of the current session; implementors
/// never read the session on their own.
pub trait IntegrationService: Send + Sync {
    /// Error type returned by integration service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Ask the backend for the third-party authorization URL.
    fn authorization_url(&self, token: &str) -> BoxFuture<'_, String, Self::Error>;

    /// Submit user-supplied OAuth app credentials and get the authorization URL.
    fn user_oauth_setup(
        &self,
        token: &str,
        credentials: &OAuthClientCredentials,
    ) -> BoxFuture<'_, String, Self::Error>;

    /// Connect through the simulated demo path.
    fn demo_connect(&self, token: &str) -> BoxFuture<'_, DemoConnectionResult, Self::Error>;

    /// Exchange the redirect's `code` and `state` for a completed connection.
    fn exchange_callback(
        &self,
        token: &str,
        code: &str,
        state: &str,
    ) -> BoxFuture<'_, CallbackExchange, Self::Error>;

    /// Current connection status of all integrations.
    fn status(&self, token: &str) -> BoxFuture<'_, IntegrationStatus, Self::Error>;

    /// Disconnect the integration.
    fn disconnect(&self, token: &str) -> BoxFuture<'_, (), Self::Error>;
}

/// Navigation side effects requested by the controllers.
#[cfg_attr(feature = "mocks", mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Replace the top-level browsing context with `url`, unmodified.
    ///
    /// Must never target an embedded frame.
    fn redirect_top_level(&self, url: &str);

    /// Navigate to an in-app `path` once `delay` has elapsed.
    fn schedule_redirect(&self, path: &str, delay: Duration);
}
