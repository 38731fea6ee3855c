//! Configuration types for console-guard
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::error::RouteTreeError;
use crate::routes::{RouteDecl, RouteTree, console_routes};
use crate::session::AccessToken;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Console API / session settings
    pub session: SessionConfig,

    /// Route guard redirect targets
    pub guard: GuardConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Route tree declaration; the built-in console routes when absent
    pub routes: Option<Vec<RouteDecl>>,
}

impl AppConfig {
    /// Build the route tree this configuration describes
    pub fn route_tree(&self) -> Result<RouteTree, RouteTreeError> {
        match &self.routes {
            Some(routes) => RouteTree::build(routes),
            None => RouteTree::build(&console_routes()),
        }
    }
}

/// Console API / session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Console backend URL (e.g., `http://localhost:8000`)
    pub api_url: String,

    /// API path prefix
    pub api_prefix: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// File the access token is stored in (`~` is expanded)
    pub token_file: Option<String>,

    /// Access token to use instead of the stored one (prefer env var CONSOLE_ACCESS_TOKEN)
    pub access_token: Option<AccessToken>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            timeout_secs: 30,
            token_file: None,
            access_token: None,
        }
    }
}

impl SessionConfig {
    /// Get the full API base URL
    pub fn api_base(&self) -> String {
        let prefix = self.api_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return self.api_url.trim_end_matches('/').to_string();
        }
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            prefix.trim_start_matches('/')
        )
    }

    /// Where the access token is persisted
    pub fn token_path(&self) -> Option<PathBuf> {
        match &self.token_file {
            Some(file) => Some(PathBuf::from(shellexpand::tilde(file).as_ref())),
            None => dirs::config_dir().map(|dir| dir.join("console-guard").join("access_token")),
        }
    }
}

/// Route guard configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Login entry point for unauthenticated users
    pub login_path: String,

    /// View shown to users lacking a role or permission
    pub forbidden_path: String,

    /// Query parameter carrying the originally requested path
    pub redirect_param: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            forbidden_path: "/403".to_string(),
            redirect_param: "redirect".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
