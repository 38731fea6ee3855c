//! Identity provider trait
//!
//! The session collaborator the guard depends on. Implementations exchange
//! credentials for an access token and resolve a token to a user identity.

use crate::access_control::UserIdentity;
use crate::error::SessionResult;
use crate::session::token::AccessToken;
// async_trait required for dyn-compatibility with Arc<dyn IdentityProvider>
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for an access token
    async fn login(&self, username: &str, password: &str) -> SessionResult<AccessToken>;

    /// Resolve the identity behind a token
    async fn current_identity(&self, token: &AccessToken) -> SessionResult<UserIdentity>;

    /// Description of the provider (for logging)
    fn provider_type(&self) -> &'static str;
}

/// Shared identity provider
pub type SharedIdentityProvider = Arc<dyn IdentityProvider>;
