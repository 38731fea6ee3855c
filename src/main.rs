//! Console Guard CLI
//!
//! Answers route access questions for the scanning console and drives the
//! route guard against a live session.

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use console_guard::{
    access_control::{AccessEvaluator, Role, UserIdentity, permissions_for_roles, roles_of},
    config::{AppConfig, LogFormat, load_config},
    guard::{GuardDriver, GuardOutcome, GuardSink, GuardTargets, RouteGuard, View},
    routes::{RouteFile, RouteTree},
    session::{
        HttpIdentityProvider, MemoryTokenStore, SessionManager, TokenStore, create_token_store,
    },
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Console Guard - route access control for the scanning console
#[derive(Parser, Debug)]
#[command(name = "console-guard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "CONSOLE_GUARD_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "CONSOLE_GUARD_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate access to a path for a given identity
    Check {
        /// Path to evaluate (e.g. /scan/create)
        path: String,

        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// Print the menu-visible routes as JSON
    Menu,

    /// Print the breadcrumb chain for a path
    Breadcrumb {
        /// Path to locate
        path: String,
    },

    /// Validate a route file, or the configured routes when none is given
    Validate {
        /// TOML file with [[routes]] tables
        #[arg(long)]
        routes: Option<PathBuf>,
    },

    /// Log in against the console API and store the access token
    Login {
        #[arg(long)]
        username: String,

        #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored access token
    Logout,

    /// Resolve the current identity and print its roles and permissions
    Whoami,

    /// Run the route guard for a path against the current session
    Guard {
        /// Requested path
        path: String,
    },
}

/// Identity to evaluate with; a plain user when nothing is given
#[derive(ClapArgs, Debug)]
struct IdentityArgs {
    /// Explicit role (repeatable)
    #[arg(long = "role", value_parser = parse_role)]
    roles: Vec<Role>,

    /// Elevated-privilege user
    #[arg(long)]
    superuser: bool,

    /// No identity at all
    #[arg(long, conflicts_with_all = ["roles", "superuser"])]
    anonymous: bool,
}

impl IdentityArgs {
    fn identity(&self) -> Option<UserIdentity> {
        if self.anonymous {
            return None;
        }
        let mut identity = if self.roles.is_empty() {
            UserIdentity::plain()
        } else {
            UserIdentity::with_roles(self.roles.iter().copied())
        };
        identity.is_superuser = self.superuser;
        Some(identity)
    }
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::try_parse(&s.to_ascii_lowercase()).ok_or_else(|| {
        format!("unknown role '{}' (expected admin, operator, user or viewer)", s)
    })
}

fn init_logging(config: &AppConfig, cli_level: Option<&str>) {
    let level = cli_level.unwrap_or(config.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn session_manager(config: &AppConfig) -> anyhow::Result<SessionManager> {
    let provider = Arc::new(
        HttpIdentityProvider::new(&config.session)
            .inspect_err(|e| error!(error = %e, "Failed to create identity provider"))?,
    );

    let tokens: Arc<dyn TokenStore> = match &config.session.access_token {
        Some(token) => Arc::new(MemoryTokenStore::with_token(token.clone())),
        None => create_token_store(&config.session),
    };

    Ok(SessionManager::new(provider, tokens))
}

/// Sink that records guard outcomes instead of navigating
#[derive(Default)]
struct RecordingSink {
    outcomes: Vec<GuardOutcome>,
}

impl GuardSink for RecordingSink {
    fn redirect_to(&mut self, path: &str) {
        self.outcomes.push(GuardOutcome::Redirect(path.to_string()));
    }

    fn render(&mut self, view: View) {
        self.outcomes.push(GuardOutcome::Render(view));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config, args.log_level.as_deref());

    info!(version = env!("CARGO_PKG_VERSION"), "Starting console-guard");

    let tree = Arc::new(
        config
            .route_tree()
            .inspect_err(|e| error!(error = %e, "Failed to build route tree"))?,
    );

    match args.command {
        Command::Check { path, identity } => {
            let evaluator = AccessEvaluator::new(tree.clone());
            let identity = identity.identity();
            let roles = identity.as_ref().map(roles_of);
            let decision = evaluator.evaluate_path(identity.as_ref(), &path);

            print_json(&json!({
                "path": path,
                "route": tree.find_by_path(&path).map(|r| r.name.as_str()),
                "roles": roles,
                "decision": decision,
            }))?;
        }
        Command::Menu => {
            print_json(&serde_json::to_value(tree.visible_menu_routes())?)?;
        }
        Command::Breadcrumb { path } => {
            let trail: Vec<_> = tree
                .breadcrumb_path(&path)
                .into_iter()
                .map(|node| json!({ "name": node.name, "title": node.title, "path": node.path }))
                .collect();
            print_json(&json!(trail))?;
        }
        Command::Validate { routes } => {
            let validated = match routes {
                Some(file) => {
                    let contents = std::fs::read_to_string(&file)
                        .with_context(|| format!("Failed to read {}", file.display()))?;
                    let route_file: RouteFile = toml::from_str(&contents)
                        .with_context(|| format!("Failed to parse {}", file.display()))?;
                    RouteTree::build(&route_file.routes)?
                }
                None => (*tree).clone(),
            };
            print_json(&json!({ "valid": true, "routes": validated.len() }))?;
        }
        Command::Login { username, password } => {
            let session = session_manager(&config)?;
            let identity = session.login(&username, &password).await?;
            print_json(&json!({ "logged_in": identity.is_some(), "identity": identity }))?;
        }
        Command::Logout => {
            session_manager(&config)?.logout()?;
            print_json(&json!({ "logged_in": false }))?;
        }
        Command::Whoami => {
            let session = session_manager(&config)?;
            match session.refresh().await {
                Some(identity) => {
                    let roles = roles_of(&identity);
                    let permissions = permissions_for_roles(&roles);
                    print_json(&json!({
                        "identity": identity,
                        "roles": roles,
                        "permissions": permissions,
                    }))?;
                }
                None => print_json(&json!({ "identity": null }))?,
            }
        }
        Command::Guard { path } => {
            let session = session_manager(&config)?;
            let guard = RouteGuard::new(
                AccessEvaluator::new(tree.clone()),
                GuardTargets::from(&config.guard),
            );

            let (path_tx, path_rx) = watch::channel(path);
            let driver = GuardDriver::new(guard, RecordingSink::default());
            let handle = tokio::spawn(driver.run(path_rx, session.subscribe()));

            session.refresh().await;

            // Closing both sources ends the driver
            drop(path_tx);
            drop(session);

            let (guard, sink) = handle.await?;
            print_json(&json!({
                "state": guard.state(),
                "outcomes": sink.outcomes,
            }))?;
        }
    }

    Ok(())
}
