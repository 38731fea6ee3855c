//! Route node types
//!
//! A [`RouteNode`] is one navigable screen or a grouping node. Nodes live in
//! the arena owned by [`RouteTree`](crate::routes::RouteTree) and refer to
//! their children by [`RouteId`].

use crate::access_control::types::{PermissionSet, RoleSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in the route tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RouteId(pub(crate) usize);

impl RouteId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Authentication requirement of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthRequirement {
    /// `requiresAuth = true`
    Required,
    /// `requiresAuth = false`
    NotRequired,
    /// Not declared; evaluated as public
    #[default]
    Unspecified,
}

impl AuthRequirement {
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => AuthRequirement::Required,
            Some(false) => AuthRequirement::NotRequired,
            None => AuthRequirement::Unspecified,
        }
    }

    pub const fn is_required(&self) -> bool {
        matches!(self, AuthRequirement::Required)
    }
}

/// Page layout a route renders into (display metadata only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Main,
    Auth,
    Blank,
}

/// One route in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteNode {
    pub id: RouteId,
    pub name: String,
    pub path: Option<String>,
    pub title: String,
    pub auth: AuthRequirement,
    /// Roles allowed to visit; empty means no role restriction
    pub roles: RoleSet,
    /// Permissions of which at least one is needed; empty means no restriction
    pub permissions: PermissionSet,
    pub hidden: bool,
    pub order: Option<u32>,
    pub icon: Option<String>,
    pub layout: Option<Layout>,
    pub keep_alive: bool,
    pub component: Option<String>,
    pub redirect: Option<String>,
    #[serde(skip)]
    pub(crate) children: Vec<RouteId>,
}

impl RouteNode {
    pub fn children(&self) -> &[RouteId] {
        &self.children
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Sort key for menu ordering: unordered nodes after every ordered one
    pub(crate) fn order_key(&self) -> u64 {
        self.order.map_or(u64::MAX, u64::from)
    }
}

impl fmt::Display for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} ({})", self.name, path),
            None => write!(f, "{}", self.name),
        }
    }
}
