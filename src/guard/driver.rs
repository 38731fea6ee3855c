//! Guard driver
//!
//! Wires the two external triggers (navigation and identity resolution)
//! into a [`RouteGuard`] and forwards each outcome to a [`GuardSink`].
//! Both triggers are `tokio::sync::watch` channels; only the latest value of
//! each matters, so a stale identity result is always evaluated against the
//! latest path.

use crate::guard::state::{GuardOutcome, IdentityState, RouteGuard, View};
use tokio::sync::watch;
use tracing::{debug, trace};

/// Outbound capabilities of the guard
pub trait GuardSink: Send {
    /// Replace the current location with `path`
    fn redirect_to(&mut self, path: &str);

    /// Display a view
    fn render(&mut self, view: View);
}

/// Runs a guard against navigation and identity channels
pub struct GuardDriver<S> {
    guard: RouteGuard,
    sink: S,
}

impl<S: GuardSink> GuardDriver<S> {
    pub fn new(guard: RouteGuard, sink: S) -> Self {
        Self { guard, sink }
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    fn dispatch(&mut self, outcome: GuardOutcome) {
        trace!(outcome = ?outcome, "Guard outcome");
        match outcome {
            GuardOutcome::Render(view) => self.sink.render(view),
            GuardOutcome::Redirect(target) => self.sink.redirect_to(&target),
        }
    }

    /// Drive the guard until both channels are closed.
    ///
    /// Returns the guard and the sink for inspection.
    pub async fn run(
        mut self,
        mut paths: watch::Receiver<String>,
        mut identity: watch::Receiver<IdentityState>,
    ) -> (RouteGuard, S) {
        // Seed from the current values before waiting for changes
        let initial_identity = identity.borrow_and_update().clone();
        self.guard.identity_changed(initial_identity);
        let initial_path = paths.borrow_and_update().clone();
        let outcome = self.guard.navigate(initial_path);
        self.dispatch(outcome);

        let mut paths_open = true;
        let mut identity_open = true;

        loop {
            tokio::select! {
                changed = paths.changed(), if paths_open => match changed {
                    Ok(()) => {
                        let path = paths.borrow_and_update().clone();
                        let outcome = self.guard.navigate(path);
                        self.dispatch(outcome);
                    }
                    Err(_) => {
                        debug!("Navigation source closed");
                        paths_open = false;
                    }
                },
                changed = identity.changed(), if identity_open => match changed {
                    Ok(()) => {
                        let state = identity.borrow_and_update().clone();
                        let outcome = self.guard.identity_changed(state);
                        self.dispatch(outcome);
                    }
                    Err(_) => {
                        debug!("Identity source closed");
                        identity_open = false;
                    }
                },
                else => break,
            }
        }

        (self.guard, self.sink)
    }
}
