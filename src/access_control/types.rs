//! Access control types
//!
//! Core types used by the access control system: the closed role set and
//! the closed permission catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Coarse-grained user category used to gate whole route subtrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
    User,
    Viewer,
}

impl Role {
    /// Get the role name as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::User => "user",
            Role::Viewer => "viewer",
        }
    }

    /// Try to parse a role from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "operator" => Some(Role::Operator),
            "user" => Some(Role::User),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    /// Get all roles
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Operator, Role::User, Role::Viewer]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Permission domain (the part before the colon)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionDomain {
    Dashboard,
    Scan,
    Report,
    User,
    System,
}

impl PermissionDomain {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PermissionDomain::Dashboard => "dashboard",
            PermissionDomain::Scan => "scan",
            PermissionDomain::Report => "report",
            PermissionDomain::User => "user",
            PermissionDomain::System => "system",
        }
    }

    /// Every permission in this domain, in catalog order
    pub fn permissions(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::all()
            .iter()
            .copied()
            .filter(move |p| p.domain() == *self)
    }
}

impl fmt::Display for PermissionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fine-grained capability, namespaced as `<domain>:<action>`
///
/// The catalog is closed: permissions are never created at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    DashboardView,
    DashboardManage,
    ScanView,
    ScanCreate,
    ScanUpdate,
    ScanDelete,
    ScanExecute,
    ReportView,
    ReportExport,
    ReportShare,
    UserView,
    UserCreate,
    UserUpdate,
    UserDelete,
    SystemView,
    SystemManage,
}

impl Permission {
    /// Get the permission identifier as a string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::DashboardView => "dashboard:view",
            Permission::DashboardManage => "dashboard:manage",
            Permission::ScanView => "scan:view",
            Permission::ScanCreate => "scan:create",
            Permission::ScanUpdate => "scan:update",
            Permission::ScanDelete => "scan:delete",
            Permission::ScanExecute => "scan:execute",
            Permission::ReportView => "report:view",
            Permission::ReportExport => "report:export",
            Permission::ReportShare => "report:share",
            Permission::UserView => "user:view",
            Permission::UserCreate => "user:create",
            Permission::UserUpdate => "user:update",
            Permission::UserDelete => "user:delete",
            Permission::SystemView => "system:view",
            Permission::SystemManage => "system:manage",
        }
    }

    /// Try to parse a permission from its `<domain>:<action>` identifier
    pub fn try_parse(s: &str) -> Option<Self> {
        Permission::all().iter().copied().find(|p| p.as_str() == s)
    }

    /// The domain this permission belongs to
    pub const fn domain(&self) -> PermissionDomain {
        match self {
            Permission::DashboardView | Permission::DashboardManage => PermissionDomain::Dashboard,
            Permission::ScanView
            | Permission::ScanCreate
            | Permission::ScanUpdate
            | Permission::ScanDelete
            | Permission::ScanExecute => PermissionDomain::Scan,
            Permission::ReportView | Permission::ReportExport | Permission::ReportShare => {
                PermissionDomain::Report
            }
            Permission::UserView
            | Permission::UserCreate
            | Permission::UserUpdate
            | Permission::UserDelete => PermissionDomain::User,
            Permission::SystemView | Permission::SystemManage => PermissionDomain::System,
        }
    }

    /// The action part of the identifier (after the colon)
    pub fn action(&self) -> &'static str {
        let s = self.as_str();
        match s.split_once(':') {
            Some((_, action)) => action,
            None => s,
        }
    }

    /// Get the full catalog
    pub fn all() -> &'static [Permission] {
        &[
            Permission::DashboardView,
            Permission::DashboardManage,
            Permission::ScanView,
            Permission::ScanCreate,
            Permission::ScanUpdate,
            Permission::ScanDelete,
            Permission::ScanExecute,
            Permission::ReportView,
            Permission::ReportExport,
            Permission::ReportShare,
            Permission::UserView,
            Permission::UserCreate,
            Permission::UserUpdate,
            Permission::UserDelete,
            Permission::SystemView,
            Permission::SystemManage,
        ]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Permission {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Permission::try_parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown permission '{}'", s)))
    }
}

/// Set of roles (ordered, duplicates collapsed)
pub type RoleSet = BTreeSet<Role>;

/// Set of permissions (ordered, duplicates collapsed)
pub type PermissionSet = BTreeSet<Permission>;
