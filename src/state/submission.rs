//! Form submission pipeline
//!
//! Turns validated form values into a request for one of the external
//! collaborators and maps the result to a [`SubmissionOutcome`]:
//!
//! 1. file attachments are read and base64-encoded,
//! 2. a URL-encoded body, JSON document or store record is built,
//! 3. exactly one call is made, without retries,
//! 4. on success every field is reset to its default.

use super::forms::{FieldValue, FormFields};
use crate::backend::{FormEndpoint, RecordStore, RequestBody, SubmissionError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Result of one submit attempt, shown in a modal until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Pending,
    Success,
    Failure(String),
}

impl SubmissionOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionOutcome::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success)
    }
}

/// Body format for form endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    UrlEncoded,
    Json,
}

/// Where a form is delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Endpoint { url: String, encoding: BodyEncoding },
    Collection { name: String },
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Endpoint { url, encoding } => write!(f, "{url} ({encoding:?})"),
            Destination::Collection { name } => write!(f, "collection '{name}'"),
        }
    }
}

/// A destination plus fields added by the application rather than the user
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub destination: Destination,
    pub extra: Map<String, Value>,
}

impl SubmissionRequest {
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// A field value after attachment transcoding
#[derive(Debug, Clone, PartialEq, Eq)]
enum EncodedValue {
    Text(String),
    File {
        name: String,
        mime_type: &'static str,
        data: String,
    },
}

/// Delivers submissions to the form endpoint or the document store
#[derive(Clone)]
pub struct SubmissionPipeline {
    endpoint: Arc<dyn FormEndpoint>,
    store: Arc<dyn RecordStore>,
}

impl SubmissionPipeline {
    pub fn new(endpoint: Arc<dyn FormEndpoint>, store: Arc<dyn RecordStore>) -> Self {
        Self { endpoint, store }
    }

    /// Submit the form's current values.
    ///
    /// Errors never escape: they become [`SubmissionOutcome::Failure`] and
    /// the values are kept so the user can retry.
    pub async fn submit(
        &self,
        form: &mut FormFields,
        request: &SubmissionRequest,
    ) -> SubmissionOutcome {
        let attempt = Uuid::new_v4();
        tracing::info!("Submitting form to {} (attempt {attempt})", request.destination);

        match self.deliver(form.values(), request).await {
            Ok(()) => {
                tracing::info!("Submission {attempt} succeeded");
                form.reset();
                SubmissionOutcome::Success
            }
            Err(e) => {
                tracing::warn!("Submission {attempt} failed: {e}");
                SubmissionOutcome::Failure(e.to_string())
            }
        }
    }

    async fn deliver(
        &self,
        values: Vec<(&'static str, FieldValue)>,
        request: &SubmissionRequest,
    ) -> Result<(), SubmissionError> {
        match &request.destination {
            Destination::Endpoint { url, .. } if url.is_empty() => {
                Err(SubmissionError::NotConfigured("Form endpoint URL"))
            }
            Destination::Endpoint { url, encoding } => {
                let encoded = transcode(values).await?;
                let body = match encoding {
                    BodyEncoding::UrlEncoded => {
                        RequestBody::UrlEncoded(url_encoded_pairs(&encoded, &request.extra))
                    }
                    BodyEncoding::Json => {
                        RequestBody::Json(Value::Object(json_document(&encoded, &request.extra)))
                    }
                };
                self.endpoint.post(url, body).await
            }
            Destination::Collection { name } => {
                let encoded = transcode(values).await?;
                let record = self
                    .store
                    .create_record(name, json_document(&encoded, &request.extra))
                    .await?;
                tracing::info!("Stored record {} in {name}", record.id);
                Ok(())
            }
        }
    }
}

/// Read and base64-encode every attached file
async fn transcode(
    values: Vec<(&'static str, FieldValue)>,
) -> Result<Vec<(&'static str, EncodedValue)>, SubmissionError> {
    let mut encoded = Vec::with_capacity(values.len());
    for (id, value) in values {
        let item = match value.attachment() {
            Some(attachment) => {
                let bytes = tokio::fs::read(&attachment.path).await.map_err(|source| {
                    SubmissionError::Attachment {
                        field: id.to_string(),
                        source,
                    }
                })?;
                EncodedValue::File {
                    name: attachment.name.clone(),
                    mime_type: attachment.mime_type(),
                    data: STANDARD.encode(bytes),
                }
            }
            None => EncodedValue::Text(value.submitted_text().to_string()),
        };
        encoded.push((id, item));
    }
    Ok(encoded)
}

fn url_encoded_pairs(
    encoded: &[(&'static str, EncodedValue)],
    extra: &Map<String, Value>,
) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (id, value) in encoded {
        match value {
            EncodedValue::Text(text) => pairs.push((id.to_string(), text.clone())),
            EncodedValue::File {
                name,
                mime_type,
                data,
            } => {
                pairs.push((id.to_string(), data.clone()));
                pairs.push((format!("{id}Name"), name.clone()));
                pairs.push((format!("{id}Type"), mime_type.to_string()));
            }
        }
    }
    for (key, value) in extra {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        pairs.push((key.clone(), text));
    }
    pairs
}

fn json_document(
    encoded: &[(&'static str, EncodedValue)],
    extra: &Map<String, Value>,
) -> Map<String, Value> {
    let mut document = Map::new();
    for (id, value) in encoded {
        let value = match value {
            EncodedValue::Text(text) => Value::String(text.clone()),
            EncodedValue::File {
                name,
                mime_type,
                data,
            } => json!({ "name": name, "mimeType": mime_type, "data": data }),
        };
        document.insert(id.to_string(), value);
    }
    for (key, value) in extra {
        document.insert(key.clone(), value.clone());
    }
    document
}
