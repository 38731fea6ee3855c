//! Error types for console-guard
//!
//! This module defines the error hierarchy used throughout the crate.
//! Access denials are not errors: they are `AccessDecision` values and are
//! resolved by the route guard into redirects. The enums below cover the
//! fallible surfaces only (configuration, route tree construction, session).

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid route tree: {0}")]
    Routes(#[from] RouteTreeError),
}

/// Route metadata tree construction errors
///
/// These are configuration defects detected once, when the tree is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteTreeError {
    #[error("Duplicate route name '{name}'")]
    DuplicateName { name: String },

    #[error("Duplicate route path '{path}' (routes '{first}' and '{second}')")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },

    #[error("Route '{route}' references unknown permission '{permission}'")]
    UnknownPermission { route: String, permission: String },

    #[error("Route '{route}' references unknown role '{role}'")]
    UnknownRole { route: String, role: String },

    #[error("Route '{route}' has an invalid path '{path}': paths must start with '/'")]
    InvalidPath { route: String, path: String },
}

/// Session / identity collaborator errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Console API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: invalid or expired access token")]
    Unauthorized,

    #[error("Login failed: invalid username or password")]
    InvalidCredentials,

    #[error("Invalid response from console API: {0}")]
    InvalidResponse(String),

    #[error("Token store error: {0}")]
    TokenStore(#[from] std::io::Error),
}

impl SessionError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => SessionError::Unauthorized,
            _ => SessionError::Api {
                status,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            },
        }
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;
