//! Session module
//!
//! The identity collaborator of the route guard: an async
//! [`IdentityProvider`] (HTTP implementation included), a [`TokenStore`]
//! for the bearer token and the [`SessionManager`] that owns the current
//! identity.

pub mod http;
pub mod manager;
pub mod provider;
pub mod token;

pub use http::HttpIdentityProvider;
pub use manager::SessionManager;
pub use provider::{IdentityProvider, SharedIdentityProvider};
pub use token::{AccessToken, FileTokenStore, MemoryTokenStore, TokenStore};

use crate::config::SessionConfig;
use std::sync::Arc;

/// Create the token store described by configuration.
///
/// Falls back to an in-memory store when no token file location is known.
pub fn create_token_store(config: &SessionConfig) -> Arc<dyn TokenStore> {
    match config.token_path() {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(MemoryTokenStore::new()),
    }
}
