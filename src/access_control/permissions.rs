//! Role → permission table and permission checks
//!
//! The table is compiled in. Every lookup is an exhaustive match over
//! [`Role`], so adding a role is a compile error until it is mapped here.

use crate::access_control::types::{Permission, PermissionSet, Role, RoleSet};

const OPERATOR_PERMISSIONS: &[Permission] = &[
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
];

const USER_PERMISSIONS: &[Permission] = &[
    Permission::DashboardView,
    Permission::ScanView,
    Permission::ScanCreate,
    Permission::ScanExecute,
    Permission::ReportView,
    Permission::ReportExport,
];

const VIEWER_PERMISSIONS: &[Permission] = &[
    Permission::DashboardView,
    Permission::ScanView,
    Permission::ReportView,
];

fn granted(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => Permission::all(),
        Role::Operator => OPERATOR_PERMISSIONS,
        Role::User => USER_PERMISSIONS,
        Role::Viewer => VIEWER_PERMISSIONS,
    }
}

/// Permissions granted to a single role
pub fn permissions_for_role(role: Role) -> PermissionSet {
    granted(role).iter().copied().collect()
}

/// Permissions granted to a role given by name.
///
/// Unrecognized names yield the empty set.
pub fn permissions_for_role_name(name: &str) -> PermissionSet {
    Role::try_parse(name)
        .map(permissions_for_role)
        .unwrap_or_default()
}

/// Union of the permissions granted to every role in `roles`
pub fn permissions_for_roles<'a>(roles: impl IntoIterator<Item = &'a Role>) -> PermissionSet {
    roles
        .into_iter()
        .flat_map(|role| granted(*role).iter().copied())
        .collect()
}

/// Check whether the roles grant a specific permission
pub fn has_permission(roles: &RoleSet, permission: Permission) -> bool {
    roles.iter().any(|role| granted(*role).contains(&permission))
}

/// Check whether the roles grant at least one of `permissions`
pub fn has_any_permission(roles: &RoleSet, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(roles, *p))
}

/// Check whether the roles grant every one of `permissions`
pub fn has_all_permissions(roles: &RoleSet, permissions: &[Permission]) -> bool {
    permissions.iter().all(|p| has_permission(roles, *p))
}

/// Component-level visibility gate
///
/// All configured criteria must hold. `permissions` and `roles` are any-of
/// lists; an empty list places no restriction. Without a role set (no user)
/// a gate with any criterion fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGate {
    pub permission: Option<Permission>,
    pub permissions: Vec<Permission>,
    pub role: Option<Role>,
    pub roles: Vec<Role>,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    pub fn any_permission(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions.extend(permissions);
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn any_role(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    fn is_unrestricted(&self) -> bool {
        self.permission.is_none()
            && self.permissions.is_empty()
            && self.role.is_none()
            && self.roles.is_empty()
    }

    /// Evaluate the gate against a resolved role set (`None` = no user)
    pub fn check(&self, roles: Option<&RoleSet>) -> bool {
        let Some(roles) = roles else {
            return self.is_unrestricted();
        };

        if let Some(permission) = self.permission
            && !has_permission(roles, permission)
        {
            return false;
        }
        if !self.permissions.is_empty() && !has_any_permission(roles, &self.permissions) {
            return false;
        }
        if let Some(role) = self.role
            && !roles.contains(&role)
        {
            return false;
        }
        if !self.roles.is_empty() && !self.roles.iter().any(|r| roles.contains(r)) {
            return false;
        }
        true
    }
}
