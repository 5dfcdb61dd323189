// --- File: crates/vasool_zoho/src/handlers.rs ---
use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};
use vasool_common::models::{ConnectionState, IntegrationKind, OAuthClientCredentials};
use vasool_common::{map_json_error, Session, VasoolError};
use vasool_config::ZohoConfig;

use crate::callback::{CallbackHandler, CallbackOutcome, CallbackParams, CallbackStatus};
use crate::error::ZohoError;
use crate::initiator::{ConnectOutcome, ConnectPhase, ConnectionInitiator};
use crate::service::SharedZohoService;
use crate::navigator::{refresh_directive, top_level_redirect, Navigation, ResponseNavigator};
use crate::status::StatusReader;

// --- State for Zoho Handlers ---
#[derive(Clone)]
pub struct ZohoState {
    pub initiator: Arc<ConnectionInitiator>,
    pub callback: Arc<CallbackHandler>,
    pub status: Arc<StatusReader>,
}

impl ZohoState {
    /// Wires the three controllers around one service and one session.
    pub fn new(service: SharedZohoService, session: Arc<Session>, config: ZohoConfig) -> Self {
        let status = Arc::new(StatusReader::new(service.clone(), session.clone()));
        let initiator = Arc::new(ConnectionInitiator::new(
            service.clone(),
            session.clone(),
            status.clone(),
        ));
        let callback = Arc::new(CallbackHandler::new(service, session, status.clone(), config));
        Self {
            initiator,
            callback,
            status,
        }
    }
}

/// Starts a connection. Answers `303` to the authorization URL, or `200` with
/// `config_choice_required` when the backend has no OAuth app.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/integrations/{kind}/connect",
    params(("kind" = String, Path, description = "Integration id, e.g. zohobooks")),
    request_body(content = OAuthClientCredentials, description = "Optional own OAuth app"),
    responses(
        (status = 303, description = "Redirect to the Zoho consent page"),
        (status = 200, description = "Demo mode or abandon must be chosen", body = ConnectOutcome),
        (status = 400, description = "Unknown or unavailable integration, or invalid credentials"),
        (status = 401, description = "Not signed in"),
        (status = 409, description = "A connection attempt is already in progress")
    ),
    tag = "Zoho Books"
))]
pub async fn connect_handler(
    State(state): State<Arc<ZohoState>>,
    Path(kind): Path<String>,
    body: Bytes,
) -> Response {
    let kind = match kind.parse::<IntegrationKind>() {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    let credentials = match parse_credentials(&body) {
        Ok(credentials) => credentials,
        Err(e) => return e.into_response(),
    };

    let navigator = ResponseNavigator::new();
    match state.initiator.connect(kind, credentials, &navigator).await {
        Ok(ConnectOutcome::Redirected { auth_url }) => match navigator.directive() {
            Some(Navigation::TopLevel(url)) => top_level_redirect(&url),
            _ => top_level_redirect(&auth_url),
        },
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => e.into_response(),
    }
}

fn parse_credentials(body: &Bytes) -> Result<Option<OAuthClientCredentials>, ZohoError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ZohoError::Validation(format!("Invalid request body: {}", e)))?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ZohoError::Validation(format!("Invalid request body: {}", e)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/integrations/zohobooks/demo",
    responses(
        (status = 200, description = "Demo connection made; state re-read from the backend", body = ConnectionState),
        (status = 409, description = "No config choice pending")
    ),
    tag = "Zoho Books"
))]
pub async fn demo_handler(
    State(state): State<Arc<ZohoState>>,
) -> Result<Json<ConnectionState>, ZohoError> {
    state.initiator.choose_demo().await.map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/integrations/zohobooks/abandon",
    responses(
        (status = 204, description = "Config choice dismissed"),
        (status = 409, description = "No config choice pending")
    ),
    tag = "Zoho Books"
))]
pub async fn abandon_handler(State(state): State<Arc<ZohoState>>) -> Result<StatusCode, ZohoError> {
    state.initiator.abandon()?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/integrations/zohobooks",
    responses(
        (status = 200, description = "Disconnected; state re-read from the backend", body = ConnectionState),
        (status = 401, description = "Not signed in")
    ),
    tag = "Zoho Books"
))]
pub async fn disconnect_handler(
    State(state): State<Arc<ZohoState>>,
) -> Result<Json<ConnectionState>, ZohoError> {
    state.initiator.disconnect().await.map(Json)
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/integrations/zohobooks/phase",
    responses((status = 200, description = "Current connect phase", body = ConnectPhase)),
    tag = "Zoho Books"
))]
pub async fn phase_handler(State(state): State<Arc<ZohoState>>) -> Json<ConnectPhase> {
    Json(state.initiator.phase())
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/integrations/zohobooks/status",
    responses(
        (status = 200, description = "Fresh connection state", body = ConnectionState),
        (status = 401, description = "Not signed in")
    ),
    tag = "Zoho Books"
))]
pub async fn status_handler(
    State(state): State<Arc<ZohoState>>,
) -> Result<Json<ConnectionState>, Response> {
    map_json_error(state.status.refresh().await, VasoolError::from)
}

/// Landing page of the Zoho redirect.
///
/// Browsers get an HTML page (with a refresh directive on success); clients
/// asking for JSON get the outcome as JSON.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/zoho/callback",
    params(CallbackParams),
    responses(
        (status = 200, description = "Terminal callback outcome", body = CallbackOutcome)
    ),
    tag = "Zoho Books"
))]
pub async fn callback_handler(
    State(state): State<Arc<ZohoState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let navigator = ResponseNavigator::new();
    // An unreadable query is handled like an empty one: invalid callback.
    let params = CallbackParams::from_query(query.as_deref().unwrap_or_default())
        .unwrap_or_default();
    let outcome = state.callback.handle(params, &navigator).await;
    debug!("Callback finished with status {:?}", outcome.status);

    let refresh = match navigator.directive() {
        Some(Navigation::Delayed { path, delay }) => Some(refresh_directive(&path, delay)),
        Some(Navigation::TopLevel(_)) => {
            warn!("Ignoring unexpected top-level redirect on the callback page");
            None
        }
        None => None,
    };

    if wants_json(&headers) {
        let mut response = Json(&outcome).into_response();
        if let Some(refresh) = refresh.as_deref().and_then(|r| r.parse().ok()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static("refresh"), refresh);
        }
        return response;
    }
    Html(render_callback_page(&outcome, refresh.as_deref())).into_response()
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json") && !accept.contains("text/html"))
        .unwrap_or(false)
}

/// Minimal page for the callback route.
pub fn render_callback_page(outcome: &CallbackOutcome, refresh: Option<&str>) -> String {
    let mut head = String::from("<meta charset=\"utf-8\">");
    if let Some(refresh) = refresh {
        head.push_str(&format!(
            "<meta http-equiv=\"refresh\" content=\"{}\">",
            escape_html(refresh)
        ));
    }

    let footer = match (outcome.status, outcome.back_to.as_deref()) {
        (CallbackStatus::Succeeded, _) => "<p>Redirecting you to dashboard...</p>".to_string(),
        (CallbackStatus::Failed, Some(back)) => format!(
            "<p><a href=\"{}\">Back to Dashboard</a></p>",
            escape_html(back)
        ),
        _ => String::new(),
    };

    format!(
        "<!DOCTYPE html><html><head>{head}<title>{title}</title></head>\
         <body><h1>{title}</h1><p>{message}</p>{footer}</body></html>",
        head = head,
        title = escape_html(&outcome.title),
        message = escape_html(&outcome.message),
        footer = footer,
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
