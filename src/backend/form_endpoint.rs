//! HTTP client for one-way form endpoints

use super::error::SubmissionError;
use super::traits::{FormEndpoint, RequestBody};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Posts form bodies to spreadsheet-style endpoints.
///
/// The endpoints answer with redirects or opaque pages, so only transport
/// failures are reported; the status code is logged and otherwise ignored.
pub struct HttpFormEndpoint {
    client: Client,
}

impl HttpFormEndpoint {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl FormEndpoint for HttpFormEndpoint {
    async fn post(&self, url: &str, body: RequestBody) -> Result<(), SubmissionError> {
        if url.is_empty() {
            return Err(SubmissionError::NotConfigured("Form endpoint URL"));
        }

        let request = self.client.post(url);
        let request = match &body {
            RequestBody::UrlEncoded(pairs) => request.form(pairs),
            RequestBody::Json(document) => request.json(document),
        };

        let response = request.send().await?;
        tracing::debug!("Form endpoint answered with {}", response.status());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_url_is_not_configured() {
        let endpoint = HttpFormEndpoint::new(Duration::from_secs(1));
        let result = endpoint
            .post("", RequestBody::UrlEncoded(Vec::new()))
            .await;
        assert!(matches!(result, Err(SubmissionError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let endpoint = HttpFormEndpoint::new(Duration::from_secs(2));
        // Port 9 on localhost (discard) is closed on test machines
        let result = endpoint
            .post(
                "http://127.0.0.1:9/exec",
                RequestBody::Json(serde_json::json!({"name": "Jane"})),
            )
            .await;
        assert!(matches!(result, Err(SubmissionError::Transport(_))));
    }
}
