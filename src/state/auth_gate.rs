//! Session guard for protected routes

use super::session::{SessionState, SessionSubscription, User};
use crate::backend::AuthProvider;
use crate::routes::Route;

/// Performs navigation requested by a gate
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    fn redirect(&mut self, route: Route);
}

/// Where a gate is in its check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for the provider's session event; render a placeholder only
    Checking,
    Authenticated(User),
    /// A redirect to the entry route has been issued
    Unauthenticated,
}

/// Wraps a protected view for as long as it is mounted.
///
/// The gate leaves `Checking` exactly once, on the first resolved session
/// event. Dropping the gate releases its subscription, so re-entering the
/// route mounts a fresh gate and checks again.
#[derive(Debug)]
pub struct AuthGate {
    state: GateState,
    subscription: SessionSubscription,
    entry: Route,
}

impl AuthGate {
    pub fn mount(provider: &dyn AuthProvider, entry: Route) -> Self {
        Self {
            state: GateState::Checking,
            subscription: provider.subscribe(),
            entry,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            GateState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Check for a delivered session event without waiting
    pub fn poll(&mut self, navigator: &mut dyn Navigator) -> &GateState {
        if self.state == GateState::Checking {
            if let Some(session) = self.subscription.try_resolved() {
                self.resolve(session, navigator);
            }
        }
        &self.state
    }

    /// Wait for the session event.
    ///
    /// Never returns while the provider stays silent.
    pub async fn settle(&mut self, navigator: &mut dyn Navigator) -> &GateState {
        if self.state == GateState::Checking {
            if let Some(session) = self.subscription.resolved().await {
                self.resolve(session, navigator);
            }
        }
        &self.state
    }

    fn resolve(&mut self, session: SessionState, navigator: &mut dyn Navigator) {
        match session {
            SessionState::SignedIn(session) => {
                self.state = GateState::Authenticated(session.user);
            }
            SessionState::SignedOut => {
                tracing::info!("User not authenticated, redirecting to {}", self.entry.path());
                self.state = GateState::Unauthenticated;
                navigator.redirect(self.entry);
            }
            SessionState::Unknown => {}
        }
    }
}
