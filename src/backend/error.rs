//! Error types for the external collaborators

use thiserror::Error;

/// Failure while delivering a form submission
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("could not read the file attached to {field}: {source}")]
    Attachment {
        field: String,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service rejected the submission ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("could not authorize the request: {0}")]
    Unauthorized(#[from] AuthError),
}

/// Failure while signing in or out
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("federated sign-in is not available")]
    FederatedUnavailable,
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("session expired, please sign in again")]
    SessionExpired,
    #[error("authentication provider error: {0}")]
    Provider(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not store the session: {0}")]
    Storage(#[from] std::io::Error),
}
