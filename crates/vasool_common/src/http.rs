// --- File: crates/vasool_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, VasoolError};

pub mod client;

/// Extension trait for VasoolError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for VasoolError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}

impl IntoResponse for VasoolError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Converts a `Result<T, VasoolError>` into a `Result<Json<T>, Response>` for handlers.
pub fn handle_json_result<T>(result: Result<T, VasoolError>) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
{
    result.map(Json).map_err(|err| err.into_response())
}

/// Converts a domain error with a custom mapper before turning it into a response.
pub fn map_json_error<T, E, F>(result: Result<T, E>, f: F) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
    F: FnOnce(E) -> VasoolError,
{
    result.map(Json).map_err(|err| f(err).into_response())
}
