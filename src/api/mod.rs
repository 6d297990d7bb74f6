use crate::domain::model::{GenerateContentRequest, GenerateContentResponse, ModelList};
use crate::utils::error::{ProbeError, Result};
use std::time::Duration;
use tracing::debug;

/// Typed client for the v1beta endpoints the probes exercise.
///
/// 金鑰只透過 `key` 查詢參數傳遞,永遠不寫入日誌。
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Transport errors carry the request URL, and ours includes the `key` query
/// parameter. Drop the URL before the error can reach a log line.
fn strip_url(e: reqwest::Error) -> ProbeError {
    ProbeError::ApiError(e.without_url())
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(strip_url)?;
        let base_url: String = base_url.into();

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `GET {base}/v1beta/models`
    pub async fn list_models(&self) -> Result<ModelList> {
        let url = format!("{}/v1beta/models", self.base_url);
        debug!("📡 GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(strip_url)?;

        let response = Self::ensure_success(response).await?;
        response.json().await.map_err(strip_url)
    }

    /// `POST {base}/v1beta/models/{model}:generateContent`
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("📡 POST {}", url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(strip_url)?;

        let response = Self::ensure_success(response).await?;
        response.json().await.map_err(strip_url)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProbeError::ApiStatusError {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            server.base_url(),
            "gemini-test",
            "test-key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_models_sends_the_key_and_parses_the_listing() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1beta/models")
                .query_param("key", "test-key");
            then.status(200).json_body(json!({
                "models": [
                    {"name": "models/gemini-2.5-flash-preview-05-20",
                     "displayName": "Gemini 2.5 Flash Preview",
                     "supportedGenerationMethods": ["generateContent", "countTokens"]}
                ]
            }));
        });

        let list = client_for(&server).list_models().await.unwrap();

        mock.assert();
        assert_eq!(list.models.len(), 1);
        assert_eq!(
            list.models[0].name,
            "models/gemini-2.5-flash-preview-05-20"
        );
    }

    #[tokio::test]
    async fn generate_content_posts_the_request_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-test:generateContent")
                .query_param("key", "test-key")
                .header("content-type", "application/json")
                .body_contains("What is a tesseract?");
            then.status(200).json_body(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "A 4-D cube."}]}}]
            }));
        });

        let request: GenerateContentRequest = serde_json::from_value(json!({
            "contents": [{"role": "user", "parts": [{"text": "What is a tesseract?"}]}]
        }))
        .unwrap();

        let response = client_for(&server)
            .generate_content(&request)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(response.first_text(), Some("A 4-D cube."));
    }

    #[tokio::test]
    async fn non_success_statuses_surface_the_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-test:generateContent");
            then.status(429).body("quota exhausted");
        });

        let request: GenerateContentRequest = serde_json::from_value(json!({
            "contents": [{"role": "user", "parts": [{"text": "hi"}]}]
        }))
        .unwrap();

        let err = client_for(&server)
            .generate_content(&request)
            .await
            .unwrap_err();

        match err {
            ProbeError::ApiStatusError { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exhausted");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn transport_errors_never_expose_the_api_key() {
        // Nothing listens on port 1; the request fails at the transport level.
        let client = GeminiClient::new(
            "http://127.0.0.1:1",
            "gemini-test",
            "SECRET-KEY-abc123",
            Duration::from_secs(2),
        )
        .unwrap();

        let request: GenerateContentRequest = serde_json::from_value(json!({
            "contents": [{"role": "user", "parts": [{"text": "hi"}]}]
        }))
        .unwrap();

        let err = client.generate_content(&request).await.unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("SECRET-KEY-abc123"), "leaked: {message}");
        assert!(!message.contains("key="), "leaked: {message}");

        let err = client.list_models().await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-abc123"));
    }

    #[test]
    fn debug_output_redacts_the_api_key() {
        let client = GeminiClient::new(
            "http://127.0.0.1:1",
            "gemini-test",
            "SECRET-KEY-abc123",
            Duration::from_secs(2),
        )
        .unwrap();

        let debugged = format!("{:?}", client);
        assert!(!debugged.contains("SECRET-KEY-abc123"), "leaked: {debugged}");
        assert!(debugged.contains("<redacted>"));
    }

    #[tokio::test]
    async fn trailing_slashes_in_the_base_url_are_trimmed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1beta/models");
            then.status(200).json_body(json!({"models": []}));
        });

        let client = GeminiClient::new(
            format!("{}/", server.base_url()),
            "gemini-test",
            "test-key",
            Duration::from_secs(5),
        )
        .unwrap();

        let list = client.list_models().await.unwrap();
        mock.assert();
        assert!(list.models.is_empty());
    }
}
