//! Bearer-authenticated JSON transport to the model provider.
//!
//! One request per call, a fixed timeout, no retry. Both the chat
//! completion client and the image client go through here so they
//! share the same failure taxonomy.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// How an upstream call failed. The three kinds stay distinguishable
/// all the way to the HTTP layer.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("API request failed: Status {status}, Response: {body}")]
    Status { status: u16, body: String },

    #[error("Request error: {0}")]
    Connectivity(String),

    #[error("Invalid API response format: {0}")]
    Malformed(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Shared provider transport: base URL, credential and a configured client.
#[derive(Clone)]
pub struct UpstreamClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl UpstreamClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| UpstreamError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` to `<base_url><path>` and decode the JSON reply.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        tracing::info!(path, status = status.as_u16(), "Upstream responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(path, status = status.as_u16(), body = %body, "Upstream returned error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        serde_json::from_str(&text)
            .map_err(|e| UpstreamError::Malformed(format!("response body is not JSON: {e}")))
    }

    fn transport_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Connectivity(format!(
                "Request timed out after {}s",
                self.timeout_secs
            ))
        } else if e.is_connect() {
            UpstreamError::Connectivity(format!("Cannot reach {}: {e}", self.base_url))
        } else {
            UpstreamError::Connectivity(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = UpstreamClient::new("http://localhost:8080/v3/", "key", 60).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/v3");
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = UpstreamClient::new("http://localhost", "very-secret", 60).unwrap();
        assert!(!format!("{client:?}").contains("very-secret"));
    }

    #[tokio::test]
    async fn sends_bearer_credential_and_decodes_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::Json(json!({"ping": true})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"pong": true}"#)
            .create_async()
            .await;

        let client = UpstreamClient::new(&server.url(), "test-key", 5).unwrap();
        let value = client.post_json("/echo", &json!({"ping": true})).await.unwrap();

        assert_eq!(value, json!({"pong": true}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_carries_code_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/echo")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let client = UpstreamClient::new(&server.url(), "k", 5).unwrap();
        let err = client.post_json("/echo", &json!({})).await.unwrap_err();

        match err {
            UpstreamError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_success_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/echo")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = UpstreamClient::new(&server.url(), "k", 5).unwrap();
        let err = client.post_json("/echo", &json!({})).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_connectivity_failure() {
        // Reserve a free port, then release it so nothing is listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = UpstreamClient::new(&format!("http://127.0.0.1:{port}"), "k", 2).unwrap();
        let err = client.post_json("/echo", &json!({})).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Connectivity(_)));
    }
}
