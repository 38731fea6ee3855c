//! Access control integration tests
//!
//! Covers the permission table laws, role resolution and the evaluator
//! against the built-in console route tree.

use console_guard::access_control::{
    AccessDecision, AccessEvaluator, DenyReason, Permission, PermissionSet, Role, RoleSet,
    UserIdentity, evaluate, permissions_for_role, permissions_for_role_name,
    permissions_for_roles, roles_of,
};
use console_guard::routes::{RouteTree, console_routes};
use rstest::rstest;
use std::sync::Arc;

// =============================================================================
// Test Helpers
// =============================================================================

fn evaluator() -> AccessEvaluator {
    AccessEvaluator::new(Arc::new(RouteTree::build(&console_routes()).unwrap()))
}

fn user(roles: &[Role]) -> UserIdentity {
    UserIdentity::with_roles(roles.iter().copied())
}

// =============================================================================
// 1. Permission Table
// =============================================================================

mod permission_table {
    use super::*;

    #[test]
    fn test_deterministic_subset_of_catalog() {
        let catalog: PermissionSet = Permission::all().iter().copied().collect();
        for role in Role::all() {
            let first = permissions_for_role(*role);
            assert_eq!(first, permissions_for_role(*role));
            assert!(first.is_subset(&catalog), "{} exceeds catalog", role);
        }
    }

    #[test]
    fn test_union_law_for_all_pairs() {
        for a in Role::all() {
            for b in Role::all() {
                let union: PermissionSet = permissions_for_role(*a)
                    .union(&permissions_for_role(*b))
                    .copied()
                    .collect();
                assert_eq!(permissions_for_roles(&[*a, *b]), union, "{} + {}", a, b);
            }
        }
    }

    #[test]
    fn test_monotonic_and_idempotent() {
        let user_only = permissions_for_roles(&[Role::User]);
        let with_viewer = permissions_for_roles(&[Role::User, Role::Viewer]);
        assert!(user_only.is_subset(&with_viewer));
        assert_eq!(permissions_for_roles(&[Role::User, Role::User]), user_only);
    }

    #[test]
    fn test_unknown_role_name() {
        assert!(permissions_for_role_name("superadmin").is_empty());
    }

    #[rstest]
    #[case(Role::Admin, 16)]
    #[case(Role::Operator, 10)]
    #[case(Role::User, 6)]
    #[case(Role::Viewer, 3)]
    fn test_role_sizes(#[case] role: Role, #[case] expected: usize) {
        assert_eq!(permissions_for_role(role).len(), expected);
    }

    #[test]
    fn test_operator_cannot_manage_users_or_system() {
        let operator = permissions_for_role(Role::Operator);
        assert!(operator.contains(&Permission::ScanDelete));
        assert!(operator.contains(&Permission::ReportShare));
        assert!(!operator.contains(&Permission::UserView));
        assert!(!operator.contains(&Permission::SystemView));
    }
}

// =============================================================================
// 2. Role Resolver
// =============================================================================

mod role_resolver {
    use super::*;

    #[rstest]
    #[case(vec![])]
    #[case(vec![Role::Viewer])]
    #[case(vec![Role::Operator, Role::User])]
    fn test_superuser_is_admin_only(#[case] roles: Vec<Role>) {
        let mut identity = user(&roles);
        identity.is_superuser = true;
        assert_eq!(roles_of(&identity), RoleSet::from([Role::Admin]));
    }

    #[test]
    fn test_plain_identity_is_user() {
        assert_eq!(roles_of(&UserIdentity::plain()), RoleSet::from([Role::User]));
    }

    #[rstest]
    #[case(r#"{"roles": ["auditor"]}"#)]
    #[case(r#"{"roles": []}"#)]
    fn test_explicit_role_list_without_known_roles_is_denied(#[case] record: &str) {
        let identity: UserIdentity = serde_json::from_str(record).unwrap();
        assert!(roles_of(&identity).is_empty());

        let evaluator = evaluator();
        assert_eq!(
            evaluator.evaluate_path(Some(&identity), "/scan/create"),
            AccessDecision::Deny(DenyReason::MissingRole)
        );
        assert_eq!(
            evaluator.evaluate_path(Some(&identity), "/dashboard"),
            AccessDecision::Deny(DenyReason::MissingRole)
        );
        // public routes stay reachable
        assert!(evaluator.evaluate_path(Some(&identity), "/").is_allowed());
    }

    #[test]
    fn test_explicit_role_list_without_known_roles_fails_permission_gate() {
        let identity: UserIdentity = serde_json::from_str(r#"{"roles": ["auditor"]}"#).unwrap();
        let tree = RouteTree::build(&[console_guard::routes::RouteDecl::new("Export")
            .path("/export")
            .meta(
                console_guard::routes::RouteMetaDecl::titled("Export")
                    .requires_auth(true)
                    .permissions(["report:export"]),
            )])
        .unwrap();
        assert_eq!(
            evaluate(Some(&identity), tree.find_by_path("/export")),
            AccessDecision::Deny(DenyReason::MissingPermission)
        );
    }

    #[test]
    fn test_explicit_roles_returned() {
        assert_eq!(
            roles_of(&user(&[Role::Viewer, Role::Operator])),
            RoleSet::from([Role::Operator, Role::Viewer])
        );
    }
}

// =============================================================================
// 3. Evaluator Decisions
// =============================================================================

mod evaluator_decisions {
    use super::*;

    #[test]
    fn test_anonymous_on_protected_route_not_authenticated() {
        assert_eq!(
            evaluator().evaluate_path(None, "/dashboard"),
            AccessDecision::Deny(DenyReason::NotAuthenticated)
        );
    }

    #[test]
    fn test_viewer_cannot_create_scans() {
        assert_eq!(
            evaluate(
                Some(&user(&[Role::Viewer])),
                evaluator().routes().find_by_path("/scan/list")
            ),
            AccessDecision::Allow
        );

        // the built-in ScanCreate route also restricts roles, so build a
        // permission-only route to observe the permission check
        let tree = RouteTree::build(&[console_guard::routes::RouteDecl::new("Create")
            .path("/create")
            .meta(
                console_guard::routes::RouteMetaDecl::titled("Create")
                    .requires_auth(true)
                    .permissions(["scan:create"]),
            )])
        .unwrap();
        assert_eq!(
            evaluate(Some(&user(&[Role::Viewer])), tree.find_by_path("/create")),
            AccessDecision::Deny(DenyReason::MissingPermission)
        );
    }

    #[test]
    fn test_superuser_reaches_system_settings() {
        assert_eq!(
            evaluator().evaluate_path(Some(&UserIdentity::superuser()), "/system/settings"),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_unregistered_route_fails_open() {
        let evaluator = evaluator();
        assert!(evaluator.evaluate_path(None, "/not/registered").is_allowed());
        assert!(
            evaluator
                .evaluate_path(Some(&user(&[Role::Viewer])), "/not/registered")
                .is_allowed()
        );
    }

    #[rstest]
    #[case("/", None, AccessDecision::Allow)]
    #[case("/login", None, AccessDecision::Allow)]
    #[case("/403", None, AccessDecision::Allow)]
    #[case("/scan/create", Some(Role::Viewer), AccessDecision::Deny(DenyReason::MissingRole))]
    #[case("/scan/create", Some(Role::User), AccessDecision::Allow)]
    #[case("/scan", Some(Role::Viewer), AccessDecision::Allow)]
    #[case("/system", Some(Role::Operator), AccessDecision::Deny(DenyReason::MissingRole))]
    #[case("/system/users", Some(Role::Operator), AccessDecision::Deny(DenyReason::MissingRole))]
    #[case("/system/users", Some(Role::Admin), AccessDecision::Allow)]
    #[case("/report/list", Some(Role::Viewer), AccessDecision::Allow)]
    #[case("/scan/list", None, AccessDecision::Deny(DenyReason::NotAuthenticated))]
    fn test_console_matrix(
        #[case] path: &str,
        #[case] role: Option<Role>,
        #[case] expected: AccessDecision,
    ) {
        let identity = role.map(|r| user(&[r]));
        assert_eq!(evaluator().evaluate_path(identity.as_ref(), path), expected);
    }

    #[test]
    fn test_plain_user_defaults_to_user_role() {
        let evaluator = evaluator();
        let plain = UserIdentity::plain();
        assert!(evaluator.evaluate_path(Some(&plain), "/scan/create").is_allowed());
        assert_eq!(
            evaluator.evaluate_path(Some(&plain), "/system/settings").reason(),
            Some(DenyReason::MissingRole)
        );
    }

    #[test]
    fn test_decision_tracks_identity_changes() {
        let evaluator = evaluator();
        let mut identity = user(&[Role::Viewer]);
        assert!(evaluator.evaluate_path(Some(&identity), "/system/users").is_denied());

        identity.is_superuser = true;
        assert!(evaluator.evaluate_path(Some(&identity), "/system/users").is_allowed());
    }
}
