//! Transport boundary to the generative backend (Ollama).
//!
//! [`OllamaClient`] makes one synchronous generation call with a bounded
//! timeout and classifies failures, plus two diagnostic probes. It never
//! retries; retry policy belongs entirely to [`crate::pipeline`]. The
//! [`Generator`] trait is the seam test code and the orchestrator program
//! against.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::OllamaSettings;

/// Timeout for the lightweight `/api/tags` availability probe.
const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

/// Prompt used by [`OllamaClient::probe`] to time a round trip.
const PROBE_PROMPT: &str = "Say hello";

/// Classified failure of a single generation attempt.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The backend refused the connection or is not running.
    #[error("generation backend unreachable: {detail}")]
    Unreachable { detail: String },

    /// The bounded per-call timeout elapsed.
    #[error("generation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The backend answered with a non-2xx status.
    #[error("generation backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },

    /// Anything else (protocol violation, body decode failure, ...).
    #[error("unexpected generation failure: {detail}")]
    Unexpected { detail: String },
}

impl GenerateError {
    /// Short taxonomy label for structured logs and error responses.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "backend_unreachable",
            Self::Timeout { .. } => "backend_timeout",
            Self::Backend { .. } => "backend_http_error",
            Self::Unexpected { .. } => "unexpected",
        }
    }
}

/// A source of raw generated text.
///
/// Implementations make exactly one attempt per call; bounding and
/// sequencing repeated attempts is the orchestrator's job.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TaggedModel>,
}

#[derive(Deserialize)]
struct TaggedModel {
    #[serde(default)]
    name: String,
}

/// Result of a timed end-to-end generation probe.
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub status: &'static str,
    pub response_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Client for Ollama's synchronous generation endpoint.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(settings: &OllamaSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// The model this client generates with.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Checks that the backend answers `/api/tags` and lists the configured
    /// model.
    pub async fn model_available(&self) -> Result<bool, GenerateError> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::Backend {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|err| self.classify(err))?;

        let wanted = self.model.to_lowercase();
        Ok(tags
            .models
            .iter()
            .any(|model| model.name.to_lowercase().contains(&wanted)))
    }

    /// Times one short generation round trip for the diagnostics endpoint.
    pub async fn probe(&self) -> ProbeReport {
        let start = Instant::now();
        let result = self.generate(PROBE_PROMPT).await;
        let response_time = format!("{:.2} seconds", start.elapsed().as_secs_f64());

        match result {
            Ok(response) => ProbeReport {
                status: "success",
                response_time,
                response: Some(response),
                error: None,
            },
            Err(err) => ProbeReport {
                status: "error",
                response_time,
                response: None,
                error: Some(err.to_string()),
            },
        }
    }

    fn classify(&self, err: reqwest::Error) -> GenerateError {
        if err.is_timeout() {
            GenerateError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if err.is_connect() {
            GenerateError::Unreachable {
                detail: err.to_string(),
            }
        } else {
            GenerateError::Unexpected {
                detail: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Generator for OllamaClient {
    /// Sends one prompt to `/api/generate` and returns the raw generated
    /// text, classifying any failure. Exactly one attempt, no retries.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::Backend {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|err| self.classify(err))?;

        Ok(payload.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer, timeout_secs: u64) -> OllamaClient {
        OllamaClient::new(&OllamaSettings {
            base_url: server.base_url(),
            model: "mistral".to_string(),
            timeout_secs,
        })
    }

    #[tokio::test]
    async fn generate_returns_backend_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body(json!({
                        "model": "mistral",
                        "prompt": "hello",
                        "stream": false,
                    }));
                then.status(200).json_body(json!({"response": "world"}));
            })
            .await;

        let client = client_for(&server, 30);
        let text = client.generate("hello").await.unwrap();
        assert_eq!(text, "world");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_2xx_is_classified_with_status_and_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(503).body("model loading");
            })
            .await;

        let client = client_for(&server, 30);
        let err = client.generate("hello").await.unwrap_err();
        match err {
            GenerateError::Backend { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "model loading");
            }
            other => panic!("expected Backend, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        // Bind-then-drop leaves a port nothing is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = OllamaClient::new(&OllamaSettings {
            base_url: format!("http://127.0.0.1:{port}"),
            model: "mistral".to_string(),
            timeout_secs: 5,
        });

        let err = client.generate("hello").await.unwrap_err();
        assert!(
            matches!(err, GenerateError::Unreachable { .. }),
            "expected Unreachable, got {err:?}"
        );
        assert_eq!(err.kind(), "backend_unreachable");
    }

    #[tokio::test]
    async fn slow_backend_is_a_timeout() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .delay(std::time::Duration::from_secs(3))
                    .json_body(json!({"response": "late"}));
            })
            .await;

        let client = client_for(&server, 1);
        let err = client.generate("hello").await.unwrap_err();
        assert!(
            matches!(err, GenerateError::Timeout { seconds: 1 }),
            "expected Timeout, got {err:?}"
        );
    }

    #[tokio::test]
    async fn model_available_matches_tag_names() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tags");
                then.status(200).json_body(json!({
                    "models": [{"name": "Mistral:7b-instruct"}, {"name": "llama3"}]
                }));
            })
            .await;

        let client = client_for(&server, 30);
        assert!(client.model_available().await.unwrap());
    }

    #[tokio::test]
    async fn model_available_is_false_when_model_missing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tags");
                then.status(200).json_body(json!({"models": [{"name": "llama3"}]}));
            })
            .await;

        let client = client_for(&server, 30);
        assert!(!client.model_available().await.unwrap());
    }

    #[tokio::test]
    async fn probe_reports_success_and_elapsed_time() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({"response": "hi there"}));
            })
            .await;

        let client = client_for(&server, 30);
        let report = client.probe().await;
        assert_eq!(report.status, "success");
        assert_eq!(report.response.as_deref(), Some("hi there"));
        assert!(report.response_time.ends_with("seconds"));
        assert!(report.error.is_none());
    }
}
