//! Route guard state machine
//!
//! ```text
//!            ┌──────────── identity pending ───────────┐
//!            ▼                                          │
//! change → Checking ── settled, allow ──────────→ Allowed
//!            │
//!            └──────── settled, deny ───────────→ DeniedRedirect
//! ```
//!
//! The guard is entered on every path change and every identity change. It
//! never evaluates while identity resolution is pending, and a denial is not
//! re-evaluated until the path or the identity changes again.

use crate::access_control::{AccessDecision, AccessEvaluator, DenyReason, UserIdentity};
use crate::config::GuardConfig;
use serde::Serialize;
use tracing::{debug, info};

/// Identity as seen by consumers of the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdentityState {
    /// Resolution in flight
    #[default]
    Pending,
    /// Resolution finished; `None` when logged out or the fetch failed
    Settled(Option<UserIdentity>),
}

impl IdentityState {
    pub fn is_pending(&self) -> bool {
        matches!(self, IdentityState::Pending)
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        match self {
            IdentityState::Settled(identity) => identity.as_ref(),
            IdentityState::Pending => None,
        }
    }
}

/// Where the guard currently stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    Checking,
    Allowed,
    DeniedRedirect { reason: DenyReason, target: String },
}

/// What the UI should display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "path", rename_all = "snake_case")]
pub enum View {
    Loading,
    Content(String),
    Forbidden,
}

/// Action the caller must perform after a guard transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum GuardOutcome {
    Render(View),
    Redirect(String),
}

/// Redirect targets used on denial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardTargets {
    pub login_path: String,
    pub forbidden_path: String,
    pub redirect_param: String,
}

impl Default for GuardTargets {
    fn default() -> Self {
        Self::from(&GuardConfig::default())
    }
}

impl From<&GuardConfig> for GuardTargets {
    fn from(config: &GuardConfig) -> Self {
        Self {
            login_path: config.login_path.clone(),
            forbidden_path: config.forbidden_path.clone(),
            redirect_param: config.redirect_param.clone(),
        }
    }
}

impl GuardTargets {
    /// Login entry point carrying the originally requested path
    pub fn login_redirect(&self, requested: &str) -> String {
        format!(
            "{}?{}={}",
            self.login_path,
            self.redirect_param,
            urlencoding::encode(requested)
        )
    }

    fn target_for(&self, reason: DenyReason, requested: &str) -> String {
        match reason {
            DenyReason::NotAuthenticated => self.login_redirect(requested),
            DenyReason::MissingRole | DenyReason::MissingPermission => {
                self.forbidden_path.clone()
            }
        }
    }
}

/// Path part of a location, without query string or fragment
fn route_path(location: &str) -> &str {
    location
        .split(['?', '#'])
        .next()
        .unwrap_or(location)
}

/// Route guard over an access evaluator
#[derive(Debug, Clone)]
pub struct RouteGuard {
    evaluator: AccessEvaluator,
    targets: GuardTargets,
    path: Option<String>,
    identity: IdentityState,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(evaluator: AccessEvaluator, targets: GuardTargets) -> Self {
        Self {
            evaluator,
            targets,
            path: None,
            identity: IdentityState::Pending,
            state: GuardState::Checking,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn identity(&self) -> &IdentityState {
        &self.identity
    }

    /// Navigation event
    pub fn navigate(&mut self, path: impl Into<String>) -> GuardOutcome {
        self.path = Some(path.into());
        self.enter()
    }

    /// Identity event; evaluation uses the latest known path
    pub fn identity_changed(&mut self, identity: IdentityState) -> GuardOutcome {
        self.identity = identity;
        self.enter()
    }

    fn enter(&mut self) -> GuardOutcome {
        self.state = GuardState::Checking;

        let Some(path) = self.path.clone() else {
            return GuardOutcome::Render(View::Loading);
        };
        let IdentityState::Settled(identity) = &self.identity else {
            debug!(path = %path, "Identity pending, holding navigation");
            return GuardOutcome::Render(View::Loading);
        };

        match self
            .evaluator
            .evaluate_path(identity.as_ref(), route_path(&path))
        {
            AccessDecision::Allow => {
                self.state = GuardState::Allowed;
                GuardOutcome::Render(View::Content(path))
            }
            AccessDecision::Deny(reason) => {
                let target = self.targets.target_for(reason, &path);
                self.state = GuardState::DeniedRedirect {
                    reason,
                    target: target.clone(),
                };

                // Already on the redirect target: redirecting again would loop
                if route_path(&target) == route_path(&path) {
                    return GuardOutcome::Render(match reason {
                        DenyReason::NotAuthenticated => View::Content(path),
                        DenyReason::MissingRole | DenyReason::MissingPermission => {
                            View::Forbidden
                        }
                    });
                }

                info!(path = %path, reason = %reason, target = %target, "Navigation denied");
                GuardOutcome::Redirect(target)
            }
        }
    }
}
