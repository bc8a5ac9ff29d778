//! Mock provider for tests and offline development.

use super::{GeneratedImage, ImageProvider, ImageRequest, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;

pub const MOCK_IMAGE_URL: &str = "https://images.mock.local/virtual-room.png";

enum Outcome {
    Succeed(String),
    Fail(String),
}

/// Mock image provider. Records every request it receives.
pub struct MockImageProvider {
    outcome: Outcome,
    requests: Mutex<Vec<ImageRequest>>,
}

impl MockImageProvider {
    pub fn succeeding(url: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Succeed(url.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Default for MockImageProvider {
    fn default() -> Self {
        Self::succeeding(MOCK_IMAGE_URL)
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.outcome {
            Outcome::Succeed(url) => Ok(GeneratedImage { url: url.clone() }),
            Outcome::Fail(message) => Err(ProviderError::Api {
                status: 500,
                message: message.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
