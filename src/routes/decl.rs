//! Declarative route shape
//!
//! The recognized external shape of a route declaration:
//!
//! ```toml
//! [[routes]]
//! name = "Scan"
//! path = "/scan"
//! meta = { title = "Scans", requiresAuth = true, order = 3 }
//!
//! [[routes.children]]
//! name = "ScanCreate"
//! path = "/scan/create"
//! meta = { title = "New scan", requiresAuth = true, roles = ["admin", "operator", "user"], permissions = ["scan:create"] }
//! ```
//!
//! Roles and permissions stay strings here; they are checked against the
//! closed sets when the tree is built.

use crate::routes::node::Layout;
use serde::Deserialize;

/// One route declaration, possibly with children
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RouteDecl {
    pub name: String,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub component: Option<String>,

    #[serde(default)]
    pub redirect: Option<String>,

    #[serde(default)]
    pub meta: Option<RouteMetaDecl>,

    #[serde(default)]
    pub children: Vec<RouteDecl>,
}

/// Route metadata block
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RouteMetaDecl {
    #[serde(default)]
    pub title: String,

    #[serde(
        default,
        rename = "requiresAuth",
        alias = "requires_auth",
        alias = "requiresauth"
    )]
    pub requires_auth: Option<bool>,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default)]
    pub permissions: Vec<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub order: Option<u32>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub layout: Option<Layout>,

    #[serde(
        default,
        rename = "keepAlive",
        alias = "keep_alive",
        alias = "keepalive"
    )]
    pub keep_alive: bool,
}

/// A standalone route file: `[[routes]]` tables at the top level
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteFile {
    #[serde(default)]
    pub routes: Vec<RouteDecl>,
}

impl RouteDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn meta(mut self, meta: RouteMetaDecl) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RouteDecl>) -> Self {
        self.children.extend(children);
        self
    }
}

impl RouteMetaDecl {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn requires_auth(mut self, required: bool) -> Self {
        self.requires_auth = Some(required);
        self
    }

    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn keep_alive(mut self) -> Self {
        self.keep_alive = true;
        self
    }
}
