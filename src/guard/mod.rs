//! Route guard
//!
//! Consumes the access evaluator on every navigation: unauthenticated users
//! are sent to the login entry point (carrying the requested path), users
//! lacking a role or permission are sent to the forbidden view, everyone
//! else gets the requested content.

pub mod driver;
pub mod state;

pub use driver::{GuardDriver, GuardSink};
pub use state::{GuardOutcome, GuardState, GuardTargets, IdentityState, RouteGuard, View};
