//! Process-wide session cell
//!
//! The authentication provider owns a [`SessionCell`] and publishes into it;
//! views observe it only through an [`AuthGate`](super::AuthGate), which
//! holds a [`SessionSubscription`] for as long as it is mounted.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

/// The signed-in user as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Tokens of an active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// What the provider currently knows about the session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The provider has not reported yet
    #[default]
    Unknown,
    SignedIn(Session),
    SignedOut,
}

impl SessionState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Unknown)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::SignedIn(session) => Some(&session.user),
            _ => None,
        }
    }
}

/// Shared holder of the current [`SessionState`]
#[derive(Debug, Clone)]
pub struct SessionCell {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::Unknown);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the state and notify every subscriber
    pub fn publish(&self, state: SessionState) {
        self.tx.send_replace(state);
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions
    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    #[cfg(test)]
    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// The active session, expired or not
    pub fn session(&self) -> Option<Session> {
        match &*self.tx.borrow() {
            SessionState::SignedIn(session) => Some(session.clone()),
            _ => None,
        }
    }
}

/// A live subscription to session events; dropping it unsubscribes
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<SessionState>,
}

impl SessionSubscription {
    /// The resolved state if the provider has reported, without waiting
    pub fn try_resolved(&mut self) -> Option<SessionState> {
        let state = self.rx.borrow_and_update();
        state.is_resolved().then(|| state.clone())
    }

    /// Wait until the provider reports a resolved state.
    ///
    /// Returns `None` if the cell was dropped before reporting.
    pub async fn resolved(&mut self) -> Option<SessionState> {
        self.rx
            .wait_for(SessionState::is_resolved)
            .await
            .ok()
            .map(|state| state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_for(email: &str) -> Session {
        Session {
            user: User {
                uid: "uid-1".into(),
                email: Some(email.into()),
                display_name: None,
            },
            id_token: "id-token".into(),
            refresh_token: "refresh-token".into(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn test_starts_unknown() {
        let cell = SessionCell::new();
        assert_eq!(cell.current(), SessionState::Unknown);
        assert!(cell.session().is_none());
    }

    #[test]
    fn test_subscriber_count_tracks_drops() {
        let cell = SessionCell::new();
        let first = cell.subscribe();
        let second = cell.subscribe();
        assert_eq!(cell.subscriber_count(), 2);
        drop(first);
        assert_eq!(cell.subscriber_count(), 1);
        drop(second);
        assert_eq!(cell.subscriber_count(), 0);
    }

    #[test]
    fn test_try_resolved_before_and_after_publish() {
        let cell = SessionCell::new();
        let mut sub = cell.subscribe();
        assert!(sub.try_resolved().is_none());
        cell.publish(SessionState::SignedOut);
        assert_eq!(sub.try_resolved(), Some(SessionState::SignedOut));
    }

    #[test]
    fn test_publish_without_subscribers_is_kept() {
        let cell = SessionCell::new();
        cell.publish(SessionState::SignedIn(session_for("jane@acme.com")));
        let mut late = cell.subscribe();
        let state = late.try_resolved().unwrap();
        assert_eq!(state.user().unwrap().email.as_deref(), Some("jane@acme.com"));
        assert_eq!(cell.session().unwrap().id_token, "id-token");
    }

    #[tokio::test]
    async fn test_resolved_waits_for_publish() {
        let cell = SessionCell::new();
        let mut sub = cell.subscribe();
        let publisher = cell.clone();
        tokio::spawn(async move {
            publisher.publish(SessionState::SignedOut);
        });
        assert_eq!(sub.resolved().await, Some(SessionState::SignedOut));
    }

    #[test]
    fn test_expired_session_is_still_reported() {
        let cell = SessionCell::new();
        let mut session = session_for("jane@acme.com");
        session.expires_at = Utc::now() - Duration::minutes(5);
        cell.publish(SessionState::SignedIn(session.clone()));
        assert_eq!(cell.session(), Some(session));
        cell.publish(SessionState::SignedOut);
        assert!(cell.session().is_none());
    }

    #[test]
    fn test_session_expiry() {
        let session = session_for("a@b.com");
        assert!(!session.is_expired(Utc::now()));
        assert!(session.is_expired(session.expires_at));
    }
}
