//! Console Guard
//!
//! Client-side route access control for a security-scanning administration
//! console (dashboard, scan tasks, reports, user and system management).
//!
//! ## Features
//!
//! - **Closed role and permission sets** with a compiled-in role → permission table
//! - **Route metadata tree** validated once at startup, with path lookup,
//!   menu projection and breadcrumbs
//! - **Access evaluator** producing `Allow` / `Deny(reason)` per navigation
//! - **Route guard** state machine redirecting to login or to a forbidden view
//! - **Session collaborator** resolving the current identity over HTTP
//!
//! ## Evaluation Order
//!
//! ```text
//! unregistered route → allow
//! auth not required  → allow
//! no identity        → deny(not_authenticated) → /login?redirect=<path>
//! role mismatch      → deny(missing_role)       → /403
//! permission missing → deny(missing_permission) → /403
//! otherwise          → allow
//! ```
//!
//! This is UX gating only; it is not a security boundary.
//!
//! ## Example Configuration
//!
//! ```toml
//! [session]
//! api_url = "http://localhost:8000"
//! # token from CONSOLE_ACCESS_TOKEN env var or the token file
//!
//! [guard]
//! login_path = "/login"
//! forbidden_path = "/403"
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod guard;
pub mod routes;
pub mod session;

// Re-export main types
pub use access_control::{AccessDecision, AccessEvaluator, DenyReason, Permission, Role, UserIdentity};
pub use config::{AppConfig, load_config};
pub use error::{ConfigError, RouteTreeError, SessionError};
pub use guard::{GuardDriver, GuardSink, IdentityState, RouteGuard};
pub use routes::{RouteNode, RouteTree};
pub use session::SessionManager;
