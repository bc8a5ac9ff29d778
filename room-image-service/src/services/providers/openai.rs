//! OpenAI Images provider.
//!
//! Calls `POST {base_url}/images/generations` and returns the URL of the
//! first generated image.

use super::{GeneratedImage, ImageProvider, ImageRequest, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
}

/// OpenAI image provider.
pub struct OpenAiImageProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiImageProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "OpenAI API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn generations_url(&self) -> String {
        format!(
            "{}/images/generations",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn map_send_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.config.timeout.as_secs())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, ProviderError> {
        let body = GenerationRequest {
            model: &request.model,
            prompt: &request.prompt,
            n: request.count,
            size: &request.size,
        };

        tracing::debug!(
            model = %request.model,
            size = %request.size,
            prompt_len = request.prompt.len(),
            "Sending request to OpenAI Images API"
        );

        let response = self
            .client
            .post(self.generations_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);

            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerationResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(e)
            } else {
                ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        parsed
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .map(|url| GeneratedImage { url })
            .ok_or(ProviderError::EmptyResponse)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// --- OpenAI API wire types ---

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImageData>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImageData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Secret::new("sk-test".to_string()),
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn generations_url_tolerates_trailing_slash() {
        let provider = OpenAiImageProvider::new(config("http://localhost:9000/v1/")).unwrap();
        assert_eq!(
            provider.generations_url(),
            "http://localhost:9000/v1/images/generations"
        );
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let mut cfg = config(OPENAI_API_BASE);
        cfg.api_key = Secret::new("  ".to_string());
        assert!(matches!(
            OpenAiImageProvider::new(cfg),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn request_body_matches_images_api() {
        let body = GenerationRequest {
            model: "dall-e-2",
            prompt: "A photorealistic, modern music room with drum",
            n: 1,
            size: "512x512",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "model": "dall-e-2",
                "prompt": "A photorealistic, modern music room with drum",
                "n": 1,
                "size": "512x512"
            })
        );
    }
}
