// --- File: crates/vasool_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Vasool client errors.
///
/// Each crate extends this by implementing `From<SpecificError> for VasoolError`.
#[derive(Error, Debug)]
pub enum VasoolError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing or rejected session token
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred while reading or writing the persisted session
    #[error("Session storage error: {0}")]
    StorageError(String),

    /// The remote backend answered with an error
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The request conflicts with an action already in progress
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for VasoolError {
    fn status_code(&self) -> u16 {
        match self {
            VasoolError::HttpError(_) => 502,
            VasoolError::ParseError(_) => 502,
            VasoolError::ConfigError(_) => 500,
            VasoolError::AuthError(_) => 401,
            VasoolError::ValidationError(_) => 400,
            VasoolError::StorageError(_) => 500,
            VasoolError::ExternalServiceError { .. } => 502,
            VasoolError::ConflictError(_) => 409,
            VasoolError::NotFoundError(_) => 404,
            VasoolError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, VasoolError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, VasoolError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, VasoolError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| VasoolError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, VasoolError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| VasoolError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for VasoolError {
    fn from(err: reqwest::Error) -> Self {
        VasoolError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for VasoolError {
    fn from(err: serde_json::Error) -> Self {
        VasoolError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for VasoolError {
    fn from(err: std::io::Error) -> Self {
        VasoolError::StorageError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> VasoolError {
    VasoolError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> VasoolError {
    VasoolError::ValidationError(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> VasoolError {
    VasoolError::AuthError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> VasoolError {
    VasoolError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> VasoolError {
    VasoolError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> VasoolError {
    VasoolError::InternalError(message.to_string())
}
