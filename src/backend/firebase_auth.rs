//! Firebase Authentication over the Identity Toolkit REST API
//!
//! Sessions are published into a [`SessionCell`]. The refresh token of the
//! last session is kept in the data directory so a restart can restore it;
//! until that restore finishes the cell stays `Unknown`. ID tokens are
//! refreshed on demand when a store request needs one that is about to expire.

use super::error::AuthError;
use super::traits::AuthProvider;
use crate::config::AppConfig;
use crate::state::{Session, SessionCell, SessionState, SessionSubscription, User};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed before use
const REFRESH_MARGIN_SECS: i64 = 60;

/// Response of `accounts:signInWithPassword` and `accounts:signInWithIdp`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: Option<String>,
}

/// Response of the secure token endpoint
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// What is written to disk between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredSession {
    uid: String,
    email: Option<String>,
    display_name: Option<String>,
    refresh_token: String,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            uid: session.user.uid.clone(),
            email: session.user.email.clone(),
            display_name: session.user.display_name.clone(),
            refresh_token: session.refresh_token.clone(),
        }
    }
}

pub struct FirebaseAuth {
    client: Client,
    api_key: String,
    google_id_token: Option<String>,
    session_path: Option<PathBuf>,
    token_url: String,
    cell: SessionCell,
}

impl FirebaseAuth {
    pub fn new(config: &AppConfig, cell: SessionCell) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.request_timeout())
                .build()
                .unwrap_or_default(),
            api_key: config.firebase_api_key.clone().unwrap_or_default(),
            google_id_token: config.google_id_token.clone(),
            session_path: AppConfig::session_path(),
            token_url: SECURE_TOKEN_URL.to_string(),
            cell,
        }
    }

    #[cfg(test)]
    fn with_session_path(mut self, path: PathBuf) -> Self {
        self.session_path = Some(path);
        self
    }

    #[cfg(test)]
    fn with_token_url(mut self, url: String) -> Self {
        self.token_url = url;
        self
    }

    /// Restore the stored session in the background.
    ///
    /// Publishes exactly one resolved state once finished: the restored
    /// session, or `SignedOut` if there is none or it can't be refreshed.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let auth = Arc::clone(self);
        tokio::spawn(async move {
            let state = match auth.restore().await {
                Ok(Some(session)) => {
                    tracing::info!("Restored session for {}", session.user.uid);
                    SessionState::SignedIn(session)
                }
                Ok(None) => SessionState::SignedOut,
                Err(e) => {
                    tracing::warn!("Could not restore session: {e}");
                    SessionState::SignedOut
                }
            };
            auth.cell.publish(state);
        })
    }

    async fn restore(&self) -> Result<Option<Session>, AuthError> {
        let Some(path) = &self.session_path else {
            return Ok(None);
        };
        let Some(stored) = read_stored(path).await? else {
            return Ok(None);
        };
        if self.api_key.is_empty() {
            return Ok(None);
        }

        let user = User {
            uid: stored.uid,
            email: stored.email,
            display_name: stored.display_name,
        };
        self.refresh(user, &stored.refresh_token).await
    }

    /// Exchange a refresh token for a new session.
    ///
    /// `Ok(None)` means the provider no longer accepts the refresh token.
    async fn refresh(&self, user: User, refresh_token: &str) -> Result<Option<Session>, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::NotConfigured("Firebase API key"));
        }

        let response = self
            .client
            .post(format!("{}?key={}", self.token_url, self.api_key))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            let message = error_message(response).await;
            tracing::debug!("Refresh rejected: {message}");
            return Ok(None);
        }
        let refreshed: RefreshResponse = response.json().await?;
        let session = Session {
            user,
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
            expires_at: expiry(refreshed.expires_in.as_deref(), Utc::now()),
        };
        if let Err(e) = self.persist(&session).await {
            tracing::warn!("Refreshed session will not survive a restart: {e}");
        }
        Ok(Some(session))
    }

    async fn sign_in(&self, method: &str, body: serde_json::Value) -> Result<User, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::NotConfigured("Firebase API key"));
        }

        let response = self
            .client
            .post(format!(
                "{IDENTITY_TOOLKIT_URL}/accounts:{method}?key={}",
                self.api_key
            ))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(map_error(&error_message(response).await));
        }

        let signed_in: SignInResponse = response.json().await?;
        let session = session_from(signed_in, Utc::now());
        let user = session.user.clone();
        if let Err(e) = self.persist(&session).await {
            tracing::warn!("Session will not survive a restart: {e}");
        }
        self.cell.publish(SessionState::SignedIn(session));
        tracing::info!("Signed in as {}", user.uid);
        Ok(user)
    }

    async fn persist(&self, session: &Session) -> Result<(), AuthError> {
        let Some(path) = &self.session_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&StoredSession::from(session))
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    fn subscribe(&self) -> SessionSubscription {
        self.cell.subscribe()
    }

    async fn sign_in_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        self.sign_in(
            "signInWithPassword",
            json!({ "email": email, "password": password, "returnSecureToken": true }),
        )
        .await
    }

    async fn sign_in_with_federated(&self) -> Result<User, AuthError> {
        let Some(token) = self.google_id_token.as_deref().filter(|t| !t.is_empty()) else {
            return Err(AuthError::FederatedUnavailable);
        };
        self.sign_in(
            "signInWithIdp",
            json!({
                "postBody": format!("id_token={token}&providerId=google.com"),
                "requestUri": "http://localhost",
                "returnIdpCredential": true,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(path) = &self.session_path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.cell.publish(SessionState::SignedOut);
        tracing::info!("Signed out");
        Ok(())
    }

    async fn id_token(&self) -> Result<Option<String>, AuthError> {
        let Some(session) = self.cell.session() else {
            return Ok(None);
        };
        if !needs_refresh(&session, Utc::now()) {
            return Ok(Some(session.id_token));
        }

        tracing::debug!("ID token for {} is expiring, refreshing", session.user.uid);
        match self.refresh(session.user, &session.refresh_token).await? {
            Some(fresh) => {
                let token = fresh.id_token.clone();
                self.cell.publish(SessionState::SignedIn(fresh));
                Ok(Some(token))
            }
            None => {
                tracing::info!("Session can no longer be refreshed");
                self.sign_out().await?;
                Err(AuthError::SessionExpired)
            }
        }
    }
}

fn needs_refresh(session: &Session, now: DateTime<Utc>) -> bool {
    session.is_expired(now + ChronoDuration::seconds(REFRESH_MARGIN_SECS))
}

async fn read_stored(path: &Path) -> Result<Option<StoredSession>, AuthError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(stored) => Ok(Some(stored)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file: {e}");
                Ok(None)
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => envelope.error.message,
        Err(_) => status.to_string(),
    }
}

/// Map an Identity Toolkit error code to an [`AuthError`]
fn map_error(message: &str) -> AuthError {
    // Codes may carry a detail suffix: "TOO_MANY_ATTEMPTS_TRY_LATER : ..."
    let code = message.split(" : ").next().unwrap_or(message).trim();
    match code {
        "INVALID_PASSWORD"
        | "EMAIL_NOT_FOUND"
        | "INVALID_LOGIN_CREDENTIALS"
        | "USER_DISABLED"
        | "INVALID_EMAIL"
        | "MISSING_PASSWORD" => AuthError::InvalidCredentials,
        "INVALID_IDP_RESPONSE" | "OPERATION_NOT_ALLOWED" => AuthError::FederatedUnavailable,
        _ => AuthError::Provider(message.to_string()),
    }
}

fn expiry(expires_in: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let secs = expires_in
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    now + ChronoDuration::seconds(secs)
}

fn session_from(response: SignInResponse, now: DateTime<Utc>) -> Session {
    Session {
        user: User {
            uid: response.local_id,
            email: response.email,
            display_name: response.display_name.filter(|n| !n.is_empty()),
        },
        id_token: response.id_token,
        refresh_token: response.refresh_token,
        expires_at: expiry(response.expires_in.as_deref(), now),
    }
}
