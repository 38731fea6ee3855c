//! Session manager
//!
//! Single owner of the current identity. It fetches the identity on start,
//! re-fetches after login and clears it on logout, publishing every change
//! on a watch channel. Consumers hold read-only receivers.
//!
//! Fetch failures are never surfaced: they settle to "no identity" so the
//! user simply goes through the unauthenticated flow.

use crate::access_control::UserIdentity;
use crate::error::SessionResult;
use crate::guard::IdentityState;
use crate::session::provider::SharedIdentityProvider;
use crate::session::token::TokenStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub struct SessionManager {
    provider: SharedIdentityProvider,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<IdentityState>,
}

impl SessionManager {
    /// Create a manager; the identity starts out pending
    pub fn new(provider: SharedIdentityProvider, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(IdentityState::Pending);
        Self {
            provider,
            tokens,
            state,
        }
    }

    /// Subscribe to identity changes
    pub fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.state.subscribe()
    }

    /// Current identity state
    pub fn current(&self) -> IdentityState {
        self.state.borrow().clone()
    }

    /// Resolve the identity from the stored token and publish the result.
    ///
    /// Publishes `Pending` first, then exactly one settled value.
    pub async fn refresh(&self) -> Option<UserIdentity> {
        self.state.send_replace(IdentityState::Pending);

        let identity = self.fetch().await;
        self.state
            .send_replace(IdentityState::Settled(identity.clone()));
        identity
    }

    async fn fetch(&self) -> Option<UserIdentity> {
        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                info!("No stored access token");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored access token");
                return None;
            }
        };

        match self.provider.current_identity(&token).await {
            Ok(identity) => {
                info!(
                    user = identity.display_name(),
                    provider = self.provider.provider_type(),
                    "Identity resolved"
                );
                Some(identity)
            }
            Err(e) => {
                warn!(error = %e, "Identity fetch failed, continuing unauthenticated");
                None
            }
        }
    }

    /// Log in, store the token and refresh the identity
    pub async fn login(&self, username: &str, password: &str) -> SessionResult<Option<UserIdentity>> {
        let token = self.provider.login(username, password).await?;
        self.tokens.save(&token)?;
        Ok(self.refresh().await)
    }

    /// Forget the token and publish "no identity"
    pub fn logout(&self) -> SessionResult<()> {
        self.tokens.clear()?;
        self.state.send_replace(IdentityState::Settled(None));
        info!("Logged out");
        Ok(())
    }
}
