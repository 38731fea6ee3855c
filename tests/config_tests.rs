//! Configuration loading tests

use console_guard::config::{AppConfig, LogFormat, load_config, load_config_from_str};
use console_guard::error::{ConfigError, RouteTreeError};
use console_guard::routes::AuthRequirement;
use console_guard::{Permission, Role};
use std::env;
use std::fs;
use tempfile::tempdir;

/// Write a config file into a fresh temporary directory
fn write_config(content: &str) -> (tempfile::TempDir, String) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("console-guard.toml");
    fs::write(&path, content).unwrap();
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

#[test]
fn test_full_config() {
    let config_str = r#"
[session]
api_url = "https://console.example.com"
api_prefix = "/api/v2"
timeout_secs = 15
token_file = "/tmp/console-guard-test/token"

[guard]
login_path = "/signin"
forbidden_path = "/denied"
redirect_param = "next"

[logging]
level = "debug"
format = "json"
"#;

    let config = load_config_from_str(config_str).unwrap();
    assert_eq!(config.session.api_base(), "https://console.example.com/api/v2");
    assert_eq!(config.session.timeout_secs, 15);
    assert_eq!(config.guard.login_path, "/signin");
    assert_eq!(config.guard.redirect_param, "next");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = load_config_from_str("").unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.session.api_url, defaults.session.api_url);
    assert_eq!(config.guard.forbidden_path, "/403");
    assert!(config.routes.is_none());
}

#[test]
fn test_routes_from_config_file() {
    let config_str = r#"
[[routes]]
name = "Home"
path = "/"
meta = { title = "Home", requiresAuth = false }

[[routes]]
name = "Audit"
path = "/audit"
meta = { title = "Audit", requiresAuth = true, roles = ["admin", "operator"], permissions = ["system:view"], order = 3 }
"#;

    let config = load_config_from_str(config_str).unwrap();
    let tree = config.route_tree().unwrap();
    assert_eq!(tree.len(), 2);

    let home = tree.find_by_path("/").unwrap();
    assert_eq!(home.auth, AuthRequirement::NotRequired);

    let audit = tree.find_by_path("/audit").unwrap();
    assert_eq!(audit.auth, AuthRequirement::Required);
    assert!(audit.roles.contains(&Role::Operator));
    assert!(audit.permissions.contains(&Permission::SystemView));
    assert_eq!(audit.order, Some(3));
}

#[test]
fn test_unknown_permission_in_routes_rejected() {
    let config_str = r#"
[[routes]]
name = "Broken"
path = "/broken"
meta = { title = "Broken", requiresAuth = true, permissions = ["scan:launch"] }
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(
        result,
        Err(ConfigError::Routes(RouteTreeError::UnknownPermission { .. }))
    ));
}

#[test]
fn test_duplicate_paths_in_routes_rejected() {
    let config_str = r#"
[[routes]]
name = "One"
path = "/same"

[[routes]]
name = "Two"
path = "/same"
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(
        result,
        Err(ConfigError::Routes(RouteTreeError::DuplicatePath { .. }))
    ));
}

#[test]
fn test_invalid_timeout() {
    let config_str = r#"
[session]
timeout_secs = 0
"#;

    assert!(matches!(
        load_config_from_str(config_str),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
#[serial_test::serial]
fn test_env_var_priority_prefixed_over_conventional_api_url() {
    let (_dir, path) = write_config(
        r#"
[session]
api_url = "https://file.example.com"
"#,
    );

    unsafe {
        env::set_var("CONSOLE_GUARD__SESSION__API_URL", "https://prefixed.example.com");
        env::set_var("CONSOLE_API_URL", "https://conventional.example.com");
    }

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.session.api_url, "https://prefixed.example.com");

    unsafe {
        env::remove_var("CONSOLE_GUARD__SESSION__API_URL");
        env::remove_var("CONSOLE_API_URL");
    }
}

#[test]
#[serial_test::serial]
fn test_env_var_conventional_api_url_fallback() {
    let (_dir, path) = write_config(
        r#"
[session]
api_url = "https://file.example.com"
"#,
    );

    unsafe {
        env::remove_var("CONSOLE_GUARD__SESSION__API_URL");
        env::set_var("CONSOLE_API_URL", "https://conventional.example.com");
    }

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.session.api_url, "https://conventional.example.com");

    unsafe {
        env::remove_var("CONSOLE_API_URL");
    }
}

#[test]
#[serial_test::serial]
fn test_env_var_access_token_fallback() {
    let (_dir, path) = write_config("");

    unsafe {
        env::remove_var("CONSOLE_GUARD__SESSION__ACCESS_TOKEN");
        env::set_var("CONSOLE_ACCESS_TOKEN", "env-token");
    }

    let config = load_config(Some(&path)).unwrap();
    let token = config.session.access_token.unwrap();
    assert_eq!(token.expose(), "env-token");
    // never printed in clear
    assert_eq!(format!("{:?}", token), "[REDACTED]");

    unsafe {
        env::remove_var("CONSOLE_ACCESS_TOKEN");
    }
}

#[test]
#[serial_test::serial]
fn test_env_var_nested_guard_override() {
    let (_dir, path) = write_config(
        r#"
[guard]
forbidden_path = "/403"
"#,
    );

    unsafe {
        env::set_var("CONSOLE_GUARD__GUARD__FORBIDDEN_PATH", "/no-access");
        env::set_var("CONSOLE_GUARD__SESSION__TIMEOUT_SECS", "7");
    }

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.guard.forbidden_path, "/no-access");
    assert_eq!(config.session.timeout_secs, 7);

    unsafe {
        env::remove_var("CONSOLE_GUARD__GUARD__FORBIDDEN_PATH");
        env::remove_var("CONSOLE_GUARD__SESSION__TIMEOUT_SECS");
    }
}
