//! Image generation provider abstractions and implementations.
//!
//! Handlers only see [`ImageProvider`]; the OpenAI client and the mock are
//! interchangeable behind it.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider returned no image")]
    EmptyResponse,
}

impl ProviderError {
    /// Stable name of the failure class, logged next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "NotConfigured",
            ProviderError::Network(_) => "Network",
            ProviderError::Timeout(_) => "Timeout",
            ProviderError::Api { .. } => "Api",
            ProviderError::RateLimited => "RateLimited",
            ProviderError::InvalidResponse(_) => "InvalidResponse",
            ProviderError::EmptyResponse => "EmptyResponse",
        }
    }
}

/// What to draw and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Model identifier (e.g., dall-e-2).
    pub model: String,
    pub prompt: String,
    /// Number of images to generate.
    pub count: u32,
    /// Target size, `WIDTHxHEIGHT`.
    pub size: String,
}

/// A generated image, reduced to where it can be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
}

/// Trait for image generation providers (e.g., OpenAI Images).
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generate an image and return the URL of the first result.
    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, ProviderError>;

    /// Short provider name for logs and health output.
    fn name(&self) -> &'static str;
}
