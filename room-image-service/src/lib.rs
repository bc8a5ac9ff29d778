pub mod config;
pub mod handlers;
pub mod prompt;
pub mod services;
pub mod startup;

use services::ImageProvider;
use std::sync::Arc;

/// Model and size sent with every generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDefaults {
    pub model: String,
    pub size: String,
}

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ImageProvider>,
    pub image: ImageDefaults,
}

impl AppState {
    pub fn new(provider: Arc<dyn ImageProvider>, image: ImageDefaults) -> Self {
        Self { provider, image }
    }
}
