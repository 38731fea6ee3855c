//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (CONSOLE_GUARD__*)
//! 2. Conventional variables (CONSOLE_API_URL, CONSOLE_ACCESS_TOKEN)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use crate::routes::AuthRequirement;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "console-guard.toml",
    ".console-guard.toml",
    "~/.config/console-guard/config.toml",
    "/etc/console-guard/config.toml",
];

/// Prefix of environment overrides, e.g. `CONSOLE_GUARD__SESSION__API_URL`
const ENV_PREFIX: &str = "CONSOLE_GUARD";

/// Conventional variables and the keys they fill when the prefixed form is absent
const CONVENTIONAL_VARS: &[(&str, &str, &str)] = &[
    ("CONSOLE_API_URL", "CONSOLE_GUARD__SESSION__API_URL", "session.api_url"),
    (
        "CONSOLE_ACCESS_TOKEN",
        "CONSOLE_GUARD__SESSION__ACCESS_TOKEN",
        "session.access_token",
    ),
];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. Defaults come from serde defaults on AppConfig

    // 2. Configuration file
    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // First existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // 3. Prefixed environment variables; `__` maps to nested keys
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    // 4. Conventional variables, unless the prefixed form is set
    builder = apply_conventional_vars(builder)?;

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn apply_conventional_vars(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (var, prefixed, key) in CONVENTIONAL_VARS {
        if std::env::var_os(prefixed).is_some() {
            continue;
        }
        if let Ok(value) = std::env::var(var) {
            builder = builder
                .set_override(*key, value)
                .map_err(|e| ConfigError::Load(e.to_string()))?;
        }
    }
    Ok(builder)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let session = &config.session;

    if session.api_url.is_empty() {
        return Err(ConfigError::Missing {
            field: "session.api_url".to_string(),
        });
    }

    if !session.api_url.starts_with("http://") && !session.api_url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            message: format!(
                "session.api_url must start with http:// or https://, got: {}",
                session.api_url
            ),
        });
    }

    if session.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            message: "session.timeout_secs must be greater than 0".to_string(),
        });
    }

    validate_guard_path(&config.guard.login_path, "guard.login_path")?;
    validate_guard_path(&config.guard.forbidden_path, "guard.forbidden_path")?;

    if config.guard.redirect_param.is_empty() {
        return Err(ConfigError::Missing {
            field: "guard.redirect_param".to_string(),
        });
    }

    // The route tree validates itself on construction
    let tree = config.route_tree()?;

    if let Some(login) = tree.find_by_path(&config.guard.login_path)
        && login.auth == AuthRequirement::Required
    {
        return Err(ConfigError::Invalid {
            message: format!(
                "guard.login_path '{}' points at route '{}', which requires authentication",
                config.guard.login_path, login.name
            ),
        });
    }

    Ok(())
}

fn validate_guard_path(path: &str, field: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::Invalid {
            message: format!("{} must start with '/', got: {}", field, path),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteTreeError;

    #[test]
    fn test_load_config_from_str_basic() {
        let toml = r#"
[session]
api_url = "https://console.example.com"
timeout_secs = 10

[guard]
login_path = "/auth/login"
"#;

        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.session.api_url, "https://console.example.com");
        assert_eq!(config.session.timeout_secs, 10);
        assert_eq!(config.guard.login_path, "/auth/login");
        assert_eq!(config.guard.forbidden_path, "/403");
    }

    #[test]
    fn test_invalid_url_error() {
        let toml = r#"
[session]
api_url = "console.example.com"
"#;
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_empty_url_error() {
        let toml = r#"
[session]
api_url = ""
"#;
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn test_relative_guard_path_error() {
        let toml = r#"
[guard]
forbidden_path = "403"
"#;
        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn test_invalid_route_tree() {
        let config = AppConfig {
            routes: Some(vec![
                crate::routes::RouteDecl::new("A").path("/a"),
                crate::routes::RouteDecl::new("A").path("/b"),
            ]),
            ..Default::default()
        };

        let result = validate_config(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::Routes(RouteTreeError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_protected_login_route_error() {
        let toml = r#"
[[routes]]
name = "Login"
path = "/login"
meta = { title = "Login", requiresAuth = true }
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("Login"));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let result = load_config(Some("/nonexistent/console-guard.toml"));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
