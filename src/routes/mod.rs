//! Route metadata tree and lookups
//!
//! Routes are declared once (compiled in via [`builtin::console_routes`] or
//! loaded from configuration), built into an immutable [`RouteTree`] and
//! read by every navigation.

pub mod builtin;
pub mod decl;
pub mod node;
pub mod tree;

pub use builtin::console_routes;
pub use decl::{RouteDecl, RouteFile, RouteMetaDecl};
pub use node::{AuthRequirement, Layout, RouteId, RouteNode};
pub use tree::{MenuEntry, RouteTree};
