//! Firestore REST client used as the ticket record store

use super::error::SubmissionError;
use super::traits::{AuthProvider, RecordStore, StoredRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
/// Field stamped with the server's request time on every new record
const CREATED_AT_FIELD: &str = "createdAt";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    write_results: Vec<WriteResult>,
    commit_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteResult {
    #[serde(default)]
    transform_results: Vec<TransformResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransformResult {
    timestamp_value: Option<DateTime<Utc>>,
}

/// Creates documents through a single-write commit.
///
/// The write is create-only and carries a `REQUEST_TIME` transform, so the
/// record's `createdAt` field holds the server's clock, not ours.
pub struct FirestoreStore {
    client: Client,
    base_url: String,
    project_id: String,
    auth: Arc<dyn AuthProvider>,
}

impl FirestoreStore {
    pub fn new(
        project_id: impl Into<String>,
        auth: Arc<dyn AuthProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: FIRESTORE_URL.to_string(),
            project_id: project_id.into(),
            auth,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)", self.project_id)
    }

    fn commit_url(&self) -> String {
        format!("{}/{}/documents:commit", self.base_url, self.database_path())
    }

    fn commit_body(&self, collection: &str, id: &str, document: Map<String, Value>) -> Value {
        json!({
            "writes": [{
                "update": {
                    "name": format!("{}/documents/{collection}/{id}", self.database_path()),
                    "fields": to_fields(document),
                },
                "updateTransforms": [{
                    "fieldPath": CREATED_AT_FIELD,
                    "setToServerValue": "REQUEST_TIME",
                }],
                "currentDocument": { "exists": false },
            }]
        })
    }
}

#[async_trait]
impl RecordStore for FirestoreStore {
    async fn create_record(
        &self,
        collection: &str,
        document: Map<String, Value>,
    ) -> Result<StoredRecord, SubmissionError> {
        if self.project_id.is_empty() {
            return Err(SubmissionError::NotConfigured("Firebase project id"));
        }

        let id = Uuid::new_v4().simple().to_string();
        let mut request = self
            .client
            .post(self.commit_url())
            .json(&self.commit_body(collection, &id, document));
        if let Some(token) = self.auth.id_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&message),
            });
        }

        let committed: CommitResponse = response.json().await?;
        let record = stored_record(id, committed)?;
        tracing::debug!("Created {collection}/{} at {}", record.id, record.created_at);
        Ok(record)
    }
}

/// The server's `createdAt` value, falling back to the commit time
fn stored_record(id: String, committed: CommitResponse) -> Result<StoredRecord, SubmissionError> {
    let write = committed
        .write_results
        .first()
        .ok_or_else(|| SubmissionError::Decode("commit returned no write result".into()))?;
    let created_at = write
        .transform_results
        .first()
        .and_then(|t| t.timestamp_value)
        .unwrap_or(committed.commit_time);
    Ok(StoredRecord { id, created_at })
}

/// Pull `error.message` out of a Google API error body
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn to_fields(document: Map<String, Value>) -> Map<String, Value> {
    document
        .into_iter()
        .map(|(key, value)| (key, to_firestore_value(value)))
        .collect()
}

/// Convert a JSON value into Firestore's typed value representation
fn to_firestore_value(value: Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // Firestore encodes 64-bit integers as strings
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": {
                "values": items.into_iter().map(to_firestore_value).collect::<Vec<_>>()
            }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": to_fields(map) } }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_server::respond_once;
    use crate::backend::{AuthError, MockAuthProvider};
    use pretty_assertions::assert_eq;

    fn store(project_id: &str, auth: MockAuthProvider) -> FirestoreStore {
        FirestoreStore::new(project_id, Arc::new(auth), Duration::from_secs(2))
    }

    #[test]
    fn test_ticket_document_fields() {
        let mut doc = Map::new();
        doc.insert("subject".into(), Value::from("Printer jam"));
        doc.insert("userId".into(), Value::Null);
        doc.insert("attempts".into(), Value::from(2));
        doc.insert("ratio".into(), Value::from(0.5));
        doc.insert("urgent".into(), Value::from(true));

        let fields = to_fields(doc);
        assert_eq!(fields["subject"], json!({ "stringValue": "Printer jam" }));
        assert_eq!(fields["userId"], json!({ "nullValue": null }));
        assert_eq!(fields["attempts"], json!({ "integerValue": "2" }));
        assert_eq!(fields["ratio"], json!({ "doubleValue": 0.5 }));
        assert_eq!(fields["urgent"], json!({ "booleanValue": true }));
    }

    #[test]
    fn test_nested_values() {
        let value = json!({ "photo": { "name": "a.png" }, "tags": ["x"] });
        assert_eq!(
            to_firestore_value(value),
            json!({
                "mapValue": { "fields": {
                    "photo": { "mapValue": { "fields": {
                        "name": { "stringValue": "a.png" }
                    }}},
                    "tags": { "arrayValue": { "values": [ { "stringValue": "x" } ] } }
                }}
            })
        );
    }

    #[test]
    fn test_commit_response_prefers_transform_time() {
        let committed: CommitResponse = serde_json::from_str(
            r#"{
                "writeResults": [{
                    "updateTime": "2024-05-01T08:30:00.200000Z",
                    "transformResults": [{ "timestampValue": "2024-05-01T08:30:00.123456Z" }]
                }],
                "commitTime": "2024-05-01T08:30:00.200000Z"
            }"#,
        )
        .unwrap();
        let record = stored_record("Xy12".into(), committed).unwrap();
        assert_eq!(record.id, "Xy12");
        assert_eq!(record.created_at.to_rfc3339(), "2024-05-01T08:30:00.123456+00:00");
    }

    #[test]
    fn test_commit_response_falls_back_to_commit_time() {
        let committed: CommitResponse = serde_json::from_str(
            r#"{"writeResults": [{}], "commitTime": "2024-05-01T08:30:00Z"}"#,
        )
        .unwrap();
        let record = stored_record("Xy12".into(), committed).unwrap();
        assert_eq!(record.created_at.to_rfc3339(), "2024-05-01T08:30:00+00:00");

        let empty: CommitResponse =
            serde_json::from_str(r#"{"commitTime": "2024-05-01T08:30:00Z"}"#).unwrap();
        assert!(matches!(
            stored_record("Xy12".into(), empty),
            Err(SubmissionError::Decode(_))
        ));
    }

    #[test]
    fn test_commit_body_stamps_server_time() {
        let store = store("helpdesk", MockAuthProvider::new());
        let mut doc = Map::new();
        doc.insert("subject".into(), Value::from("Printer jam"));

        let body = store.commit_body("tickets", "abc", doc);
        assert_eq!(
            body,
            json!({
                "writes": [{
                    "update": {
                        "name": "projects/helpdesk/databases/(default)/documents/tickets/abc",
                        "fields": { "subject": { "stringValue": "Printer jam" } },
                    },
                    "updateTransforms": [{
                        "fieldPath": "createdAt",
                        "setToServerValue": "REQUEST_TIME",
                    }],
                    "currentDocument": { "exists": false },
                }]
            })
        );
    }

    #[test]
    fn test_rejection_message_extracts_error() {
        let body = r#"{"error": {"code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED"}}"#;
        assert_eq!(rejection_message(body), "Missing or insufficient permissions.");
        assert_eq!(rejection_message("Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_missing_project_is_not_configured() {
        let store = store("", MockAuthProvider::new());
        let result = store.create_record("tickets", Map::new()).await;
        assert!(matches!(result, Err(SubmissionError::NotConfigured(_))));
    }

    #[test]
    fn test_commit_url() {
        let store = store("helpdesk", MockAuthProvider::new());
        assert_eq!(
            store.commit_url(),
            "https://firestore.googleapis.com/v1/projects/helpdesk/databases/(default)/documents:commit"
        );
    }

    #[tokio::test]
    async fn test_expired_session_fails_before_sending() {
        let mut auth = MockAuthProvider::new();
        auth.expect_id_token()
            .times(1)
            .returning(|| Err(AuthError::SessionExpired));
        // Port 9 is closed; the request must not get that far
        let store = store("helpdesk", auth).with_base_url("http://127.0.0.1:9".into());

        let result = store.create_record("tickets", Map::new()).await;
        assert!(matches!(
            result,
            Err(SubmissionError::Unauthorized(AuthError::SessionExpired))
        ));
    }

    #[tokio::test]
    async fn test_create_record_commits_with_bearer_token() {
        let (url, request) = respond_once(
            200,
            r#"{"writeResults": [{"transformResults": [{"timestampValue": "2024-05-01T08:30:00Z"}]}], "commitTime": "2024-05-01T08:30:01Z"}"#,
        )
        .await;
        let mut auth = MockAuthProvider::new();
        auth.expect_id_token()
            .times(1)
            .returning(|| Ok(Some("fresh-token".into())));
        let store = store("helpdesk", auth).with_base_url(url);
        let mut doc = Map::new();
        doc.insert("subject".into(), Value::from("Printer jam"));

        let record = store.create_record("tickets", doc).await.unwrap();
        assert_eq!(record.id.len(), 32);
        assert_eq!(record.created_at.to_rfc3339(), "2024-05-01T08:30:00+00:00");

        let request = request.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request
            .starts_with("POST /projects/helpdesk/databases/(default)/documents:commit "));
        assert!(lower.contains("authorization: bearer fresh-token"));
        assert!(request.contains(&format!("documents/tickets/{}", record.id)));
        assert!(request.contains(r#""setToServerValue":"REQUEST_TIME""#));
    }
}
