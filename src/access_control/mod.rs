//! Access control module
//!
//! Role → permission resolution and route access evaluation for the console.
//!
//! ## Access Control Model
//!
//! ```text
//! identity → roles → permissions
//!                 ↘         ↘
//!          route.roles   route.permissions  → Allow | Deny(reason)
//! ```
//!
//! - A superuser resolves to `{admin}`; otherwise the explicit role list is
//!   used as is, even when empty. Only an identity with no role list at all
//!   falls back to `{user}`.
//! - A route's role list and permission list are each any-of; an empty list
//!   places no restriction.
//! - Routes that are unregistered or do not require authentication are
//!   public.
//!
//! ## Example Route Declaration
//!
//! ```toml
//! [[routes]]
//! name = "ScanCreate"
//! path = "/scan/create"
//! meta = { title = "New scan", requiresAuth = true, roles = ["admin", "operator", "user"], permissions = ["scan:create"] }
//! ```

pub mod evaluator;
pub mod permissions;
pub mod roles;
pub mod types;

pub use evaluator::{AccessDecision, AccessEvaluator, DenyReason, evaluate};
pub use permissions::{
    PermissionGate, has_all_permissions, has_any_permission, has_permission,
    permissions_for_role, permissions_for_role_name, permissions_for_roles,
};
pub use roles::{UserIdentity, roles_of};
pub use types::{Permission, PermissionDomain, PermissionSet, Role, RoleSet};
