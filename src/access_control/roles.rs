//! Role resolution
//!
//! Derives a user's effective role set from the identity record supplied by
//! the session collaborator.

use crate::access_control::types::{Role, RoleSet};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Identity of the logged-in user, as returned by the console API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Elevated-privilege flag; short-circuits any explicit role list
    #[serde(default)]
    pub is_superuser: bool,

    /// Explicit role list, if the backend assigned one
    #[serde(default, deserialize_with = "deserialize_known_roles")]
    pub roles: Option<Vec<Role>>,
}

fn default_active() -> bool {
    true
}

/// Accept role lists containing names outside the closed set, dropping them.
fn deserialize_known_roles<'de, D>(deserializer: D) -> Result<Option<Vec<Role>>, D::Error>
where
    D: Deserializer<'de>,
{
    let names: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(names.map(|names| {
        names
            .into_iter()
            .filter_map(|name| {
                let role = Role::try_parse(&name);
                if role.is_none() {
                    warn!(role = %name, "Ignoring unknown role in identity record");
                }
                role
            })
            .collect()
    }))
}

impl UserIdentity {
    /// Identity carrying the elevated-privilege flag
    pub fn superuser() -> Self {
        Self {
            is_active: true,
            is_superuser: true,
            ..Default::default()
        }
    }

    /// Identity with an explicit role list
    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            is_active: true,
            roles: Some(roles.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Identity with neither the elevated flag nor explicit roles
    pub fn plain() -> Self {
        Self {
            is_active: true,
            ..Default::default()
        }
    }

    /// Name to show in logs
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("<anonymous>")
    }
}

/// Resolve the effective role set of an identity.
///
/// 1. superuser → `{Admin}`, regardless of any explicit roles
/// 2. explicit role list → that list, even when empty
/// 3. no role list → `{User}`
///
/// An explicit list left empty (or holding only unknown names) passes no
/// role or permission check.
pub fn roles_of(identity: &UserIdentity) -> RoleSet {
    if identity.is_superuser {
        return RoleSet::from([Role::Admin]);
    }

    match &identity.roles {
        Some(roles) => roles.iter().copied().collect(),
        None => RoleSet::from([Role::User]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superuser_short_circuits_roles() {
        let mut identity = UserIdentity::with_roles([Role::Viewer, Role::Operator]);
        identity.is_superuser = true;
        assert_eq!(roles_of(&identity), RoleSet::from([Role::Admin]));
    }

    #[test]
    fn test_explicit_roles_verbatim() {
        let identity = UserIdentity::with_roles([Role::Viewer, Role::Operator, Role::Viewer]);
        assert_eq!(
            roles_of(&identity),
            RoleSet::from([Role::Viewer, Role::Operator])
        );
    }

    #[test]
    fn test_default_role() {
        assert_eq!(roles_of(&UserIdentity::plain()), RoleSet::from([Role::User]));
    }

    #[test]
    fn test_explicit_empty_list_has_no_roles() {
        assert!(roles_of(&UserIdentity::with_roles([])).is_empty());

        let identity: UserIdentity = serde_json::from_str(r#"{"roles": ["auditor"]}"#).unwrap();
        assert_eq!(identity.roles, Some(vec![]));
        assert!(roles_of(&identity).is_empty());
    }

    #[test]
    fn test_deserialize_user_record() {
        let json = r#"{
            "id": 2,
            "email": "operator@example.com",
            "username": "operator",
            "is_active": true,
            "is_superuser": false,
            "roles": ["operator", "auditor"],
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let identity: UserIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.roles, Some(vec![Role::Operator]));
        assert_eq!(identity.display_name(), "operator");
        assert_eq!(roles_of(&identity), RoleSet::from([Role::Operator]));
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let identity: UserIdentity = serde_json::from_str(r#"{"roles": null}"#).unwrap();
        assert!(identity.is_active);
        assert!(!identity.is_superuser);
        assert_eq!(identity.roles, None);
        assert_eq!(identity.display_name(), "<anonymous>");
    }
}
