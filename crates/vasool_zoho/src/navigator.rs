// --- File: crates/vasool_zoho/src/navigator.rs ---
//! Navigation for the HTTP shell.
//!
//! The browser that hit the shell is the top-level browsing context, so a
//! top-level redirect becomes a `303 See Other` answer to that request and a
//! delayed redirect becomes a refresh directive on the rendered page.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{error, warn};
use vasool_common::Navigator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    TopLevel(String),
    Delayed { path: String, delay: Duration },
}

/// Records the navigation requested while serving one request.
#[derive(Debug, Default)]
pub struct ResponseNavigator {
    requested: Mutex<Vec<Navigation>>,
}

impl ResponseNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last navigation requested, if any.
    pub fn directive(&self) -> Option<Navigation> {
        self.requested.lock().ok()?.last().cloned()
    }

    /// Number of navigations requested so far.
    pub fn count(&self) -> usize {
        self.requested.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn push(&self, navigation: Navigation) {
        match self.requested.lock() {
            Ok(mut requested) => {
                if !requested.is_empty() {
                    warn!("More than one navigation requested for a single response");
                }
                requested.push(navigation);
            }
            Err(_) => error!("Navigator lock poisoned, navigation dropped"),
        }
    }
}

impl Navigator for ResponseNavigator {
    fn redirect_top_level(&self, url: &str) {
        self.push(Navigation::TopLevel(url.to_string()));
    }

    fn schedule_redirect(&self, path: &str, delay: Duration) {
        self.push(Navigation::Delayed {
            path: path.to_string(),
            delay,
        });
    }
}

/// `303 See Other` to `url`, forbidden from rendering inside a frame.
pub fn top_level_redirect(url: &str) -> Response {
    match HeaderValue::from_str(url) {
        Ok(location) => (
            StatusCode::SEE_OTHER,
            [
                (header::LOCATION, location),
                (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
            ],
        )
            .into_response(),
        Err(e) => {
            error!("Authorization URL is not a valid header value: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                "Backend returned an unusable authorization URL",
            )
                .into_response()
        }
    }
}

/// Value of a `Refresh` header or meta tag: `<seconds>;url=<path>`.
pub fn refresh_directive(path: &str, delay: Duration) -> String {
    // Refresh only takes whole seconds; round up so the message stays readable.
    let secs = delay.as_millis().div_ceil(1000);
    format!("{};url={}", secs, path)
}
