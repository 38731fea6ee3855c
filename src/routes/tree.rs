//! Route metadata tree
//!
//! An immutable arena of [`RouteNode`]s built once from declarations and
//! validated at construction:
//! - route names are unique
//! - declared paths are unique and start with `/`
//! - every role and permission referenced exists in the closed sets
//!
//! Every permission in the closed set is granted to `admin`, so a route
//! requirement can always be met by some role.

use crate::access_control::types::{Permission, PermissionSet, Role, RoleSet};
use crate::error::RouteTreeError;
use crate::routes::decl::RouteDecl;
use crate::routes::node::{AuthRequirement, RouteId, RouteNode};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Read-only forest of routes
#[derive(Debug, Clone)]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
    roots: Vec<RouteId>,
}

/// A menu-visible route with its visible, sorted children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry<'a> {
    #[serde(flatten)]
    pub node: &'a RouteNode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuEntry<'a>>,
}

impl RouteTree {
    /// Build and validate a tree from route declarations
    pub fn build(decls: &[RouteDecl]) -> Result<Self, RouteTreeError> {
        let mut builder = Builder::default();
        let roots = decls
            .iter()
            .map(|decl| builder.add(decl))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(routes = builder.nodes.len(), "Built route tree");

        Ok(Self {
            nodes: builder.nodes,
            roots,
        })
    }

    /// Number of routes (all levels)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level routes in declaration order
    pub fn roots(&self) -> impl Iterator<Item = &RouteNode> + '_ {
        self.roots.iter().map(|id| self.get(*id))
    }

    /// Get a node by id.
    ///
    /// Ids are only handed out by this tree, so lookup cannot miss.
    pub fn get(&self, id: RouteId) -> &RouteNode {
        &self.nodes[id.0]
    }

    /// Children of a node in declaration order
    pub fn children<'a>(&'a self, node: &'a RouteNode) -> impl Iterator<Item = &'a RouteNode> + 'a {
        node.children.iter().map(move |id| self.get(*id))
    }

    /// All routes in pre-order
    pub fn iter(&self) -> impl Iterator<Item = &RouteNode> + '_ {
        // The builder pushes parents before their children, depth first,
        // so arena order is pre-order.
        self.nodes.iter()
    }

    /// Find a route by exact path; the first pre-order match wins
    pub fn find_by_path(&self, path: &str) -> Option<&RouteNode> {
        let found = self.iter().find(|n| n.path.as_deref() == Some(path));
        trace!(path, found = found.map(|n| n.name.as_str()), "Route lookup");
        found
    }

    /// Find a route by its unique name
    pub fn find_by_name(&self, name: &str) -> Option<&RouteNode> {
        self.iter().find(|n| n.name == name)
    }

    /// Menu projection: hidden routes removed at every level, siblings
    /// sorted by order ascending (stable; unordered routes last)
    pub fn visible_menu_routes(&self) -> Vec<MenuEntry<'_>> {
        self.menu_level(&self.roots)
    }

    fn menu_level(&self, ids: &[RouteId]) -> Vec<MenuEntry<'_>> {
        let mut entries: Vec<MenuEntry<'_>> = ids
            .iter()
            .map(|id| self.get(*id))
            .filter(|node| !node.hidden)
            .map(|node| MenuEntry {
                node,
                children: self.menu_level(&node.children),
            })
            .collect();
        entries.sort_by_key(|entry| entry.node.order_key());
        entries
    }

    /// Root-to-match chain for `path`, or empty when no route has it
    pub fn breadcrumb_path(&self, path: &str) -> Vec<&RouteNode> {
        let mut trail = Vec::new();
        for root in &self.roots {
            if self.search(*root, path, &mut trail) {
                return trail;
            }
        }
        Vec::new()
    }

    fn search<'a>(&'a self, id: RouteId, path: &str, trail: &mut Vec<&'a RouteNode>) -> bool {
        let node = self.get(id);
        trail.push(node);
        if node.path.as_deref() == Some(path) {
            return true;
        }
        for child in &node.children {
            if self.search(*child, path, trail) {
                return true;
            }
        }
        trail.pop();
        false
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<RouteNode>,
    names: HashMap<String, RouteId>,
    paths: HashMap<String, RouteId>,
}

impl Builder {
    fn add(&mut self, decl: &RouteDecl) -> Result<RouteId, RouteTreeError> {
        let id = RouteId(self.nodes.len());

        if self.names.insert(decl.name.clone(), id).is_some() {
            return Err(RouteTreeError::DuplicateName {
                name: decl.name.clone(),
            });
        }

        if let Some(path) = &decl.path {
            if !path.starts_with('/') {
                return Err(RouteTreeError::InvalidPath {
                    route: decl.name.clone(),
                    path: path.clone(),
                });
            }
            if let Some(first) = self.paths.insert(path.clone(), id) {
                return Err(RouteTreeError::DuplicatePath {
                    path: path.clone(),
                    first: self.nodes[first.0].name.clone(),
                    second: decl.name.clone(),
                });
            }
        }

        let meta = decl.meta.clone().unwrap_or_default();
        let roles = parse_roles(&decl.name, &meta.roles)?;
        let permissions = parse_permissions(&decl.name, &meta.permissions)?;

        self.nodes.push(RouteNode {
            id,
            name: decl.name.clone(),
            path: decl.path.clone(),
            title: meta.title,
            auth: AuthRequirement::from_flag(meta.requires_auth),
            roles,
            permissions,
            hidden: meta.hidden,
            order: meta.order,
            icon: meta.icon,
            layout: meta.layout,
            keep_alive: meta.keep_alive,
            component: decl.component.clone(),
            redirect: decl.redirect.clone(),
            children: Vec::new(),
        });

        let children = decl
            .children
            .iter()
            .map(|child| self.add(child))
            .collect::<Result<Vec<_>, _>>()?;
        self.nodes[id.0].children = children;

        Ok(id)
    }
}

fn parse_roles(route: &str, names: &[String]) -> Result<RoleSet, RouteTreeError> {
    names
        .iter()
        .map(|name| {
            Role::try_parse(name).ok_or_else(|| RouteTreeError::UnknownRole {
                route: route.to_string(),
                role: name.clone(),
            })
        })
        .collect()
}

fn parse_permissions(route: &str, names: &[String]) -> Result<PermissionSet, RouteTreeError> {
    names
        .iter()
        .map(|name| {
            Permission::try_parse(name).ok_or_else(|| RouteTreeError::UnknownPermission {
                route: route.to_string(),
                permission: name.clone(),
            })
        })
        .collect()
}
