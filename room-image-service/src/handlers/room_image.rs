//! Virtual room image generation handler.

use crate::prompt::build_prompt;
use crate::services::{ImageRequest, ProviderError};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::backtrace::Backtrace;

/// Number of prompt characters written to the log.
pub const PROMPT_LOG_CHARS: usize = 300;

/// Products the shopper picked. Order and duplicates are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSelection {
    pub products: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomImageResponse {
    pub image_url: String,
    pub prompt: String,
}

/// `POST /generate-virtual-room-image`
///
/// Provider failures are logged in full and answered with an opaque 500.
pub async fn generate_virtual_room_image(
    State(state): State<AppState>,
    payload: Result<Json<ProductSelection>, JsonRejection>,
) -> Result<Json<RoomImageResponse>, AppError> {
    let Json(selection) = payload?;
    tracing::info!(products = ?selection.products, "/generate-virtual-room-image");

    let prompt = build_prompt(&selection.products);
    tracing::info!(prompt = %truncate_chars(&prompt, PROMPT_LOG_CHARS), "Prompt built");

    let request = ImageRequest {
        model: state.image.model.clone(),
        prompt,
        count: 1,
        size: state.image.size.clone(),
    };

    match state.provider.generate(&request).await {
        Ok(image) => {
            tracing::info!(image_url = %image.url, "Image generated");
            Ok(Json(RoomImageResponse {
                image_url: image.url,
                prompt: request.prompt,
            }))
        }
        Err(err) => Err(provider_failure(state.provider.name(), err)),
    }
}

fn provider_failure(provider: &str, err: ProviderError) -> AppError {
    let kind = err.kind();
    let message = err.to_string();
    let err = anyhow::Error::new(err).context("image generation failed");
    // Captured regardless of RUST_BACKTRACE.
    let backtrace = Backtrace::force_capture();
    tracing::error!(
        provider,
        error_kind = kind,
        error = %message,
        details = ?err,
        backtrace = %backtrace,
        "Error in image generation endpoint"
    );
    AppError::InternalError(err)
}

/// First `max` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
