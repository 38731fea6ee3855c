//! Access evaluator
//!
//! Decides whether an identity (or its absence) may visit a route:
//! 1. Unregistered route → allow
//! 2. Authentication not required (explicitly or unspecified) → allow
//! 3. Authentication required, no identity → deny (not authenticated)
//! 4. Required roles declared and none held → deny (missing role)
//! 5. Required permissions declared and none granted → deny (missing permission)
//! 6. Otherwise → allow

use crate::access_control::permissions::permissions_for_roles;
use crate::access_control::roles::{UserIdentity, roles_of};
use crate::routes::{AuthRequirement, RouteNode, RouteTree};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Why access was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    NotAuthenticated,
    MissingRole,
    MissingPermission,
}

impl DenyReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "not_authenticated",
            DenyReason::MissingRole => "missing_role",
            DenyReason::MissingPermission => "missing_permission",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Access is allowed
    Allow,
    /// Access is denied with a reason
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Deny(_))
    }

    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::Deny(reason) => Some(*reason),
        }
    }
}

/// Evaluate access to an already looked-up route (`None` = unregistered)
pub fn evaluate(identity: Option<&UserIdentity>, route: Option<&RouteNode>) -> AccessDecision {
    let Some(route) = route else {
        trace!("Route not registered, allowing");
        return AccessDecision::Allow;
    };

    match route.auth {
        AuthRequirement::NotRequired | AuthRequirement::Unspecified => {
            return AccessDecision::Allow;
        }
        AuthRequirement::Required => {}
    }

    let Some(identity) = identity else {
        return AccessDecision::Deny(DenyReason::NotAuthenticated);
    };

    let roles = roles_of(identity);

    if !route.roles.is_empty() && route.roles.is_disjoint(&roles) {
        return AccessDecision::Deny(DenyReason::MissingRole);
    }

    if !route.permissions.is_empty() {
        let granted = permissions_for_roles(&roles);
        if route.permissions.is_disjoint(&granted) {
            return AccessDecision::Deny(DenyReason::MissingPermission);
        }
    }

    AccessDecision::Allow
}

/// Access evaluator bound to a route tree
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    routes: Arc<RouteTree>,
}

impl AccessEvaluator {
    pub fn new(routes: Arc<RouteTree>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RouteTree {
        &self.routes
    }

    /// Look up `path` and evaluate access to it
    pub fn evaluate_path(&self, identity: Option<&UserIdentity>, path: &str) -> AccessDecision {
        let route = self.routes.find_by_path(path);
        let decision = evaluate(identity, route);

        debug!(
            path,
            route = route.map(|r| r.name.as_str()),
            user = identity.map(UserIdentity::display_name),
            decision = ?decision,
            "Evaluated route access"
        );

        decision
    }
}
