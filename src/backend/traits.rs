//! Trait abstractions for external services to enable mocking in tests

use super::error::{AuthError, SubmissionError};
use crate::state::{SessionSubscription, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Body of a form endpoint request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` key/value pairs
    UrlEncoded(Vec<(String, String)>),
    Json(Value),
}

/// Identity and creation time assigned by the document store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// One-way form submission endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormEndpoint: Send + Sync {
    /// POST the body; the response content is not inspected
    async fn post(&self, url: &str, body: RequestBody) -> Result<(), SubmissionError>;
}

/// Document store with server-assigned identity
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_record(
        &self,
        collection: &str,
        document: Map<String, Value>,
    ) -> Result<StoredRecord, SubmissionError>;
}

/// Authentication provider operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Subscribe to session events; dropping the subscription unsubscribes
    fn subscribe(&self) -> SessionSubscription;

    /// Sign in with email and password
    async fn sign_in_with_credentials(&self, email: &str, password: &str)
        -> Result<User, AuthError>;

    /// Sign in through the federated (Google) provider
    async fn sign_in_with_federated(&self) -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// ID token for authorizing store requests, refreshed if it is about to
    /// expire. `None` when nobody is signed in.
    async fn id_token(&self) -> Result<Option<String>, AuthError>;
}
