use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Body of every 500 response. Internal failure detail stays in the logs.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal server error. See server logs for details.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String, Option<u64>),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Body read failures keep their own status; only a body that was read but
/// does not describe the expected JSON is a validation error.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(err) => match err.status() {
                StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(err.body_text()),
                _ => AppError::BadRequest(err.body_text()),
            },
            other => AppError::ValidationError(other.body_text()),
        }
    }
}

/// Error payload: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail, retry_after) = match self {
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::TooManyRequests(msg, retry) => (StatusCode::TOO_MANY_REQUESTS, msg, retry),
            AppError::InternalError(_) | AppError::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_DETAIL.to_string(),
                None,
            ),
        };

        let mut res = (status, Json(ErrorResponse { detail })).into_response();

        if let Some(retry) = retry_after {
            res.headers_mut()
                .insert(axum::http::header::RETRY_AFTER, retry.into());
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let err = AppError::InternalError(anyhow::anyhow!("api key sk-live-123 rejected"));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(res).await;
        assert_eq!(body, serde_json::json!({ "detail": INTERNAL_ERROR_DETAIL }));
    }

    #[tokio::test]
    async fn too_many_requests_sets_retry_after() {
        let res = AppError::TooManyRequests("Too many requests".to_string(), Some(17)).into_response();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers()["retry-after"], "17");

        let body = body_json(res).await;
        assert_eq!(body["detail"], "Too many requests");
    }

    #[tokio::test]
    async fn validation_error_is_unprocessable() {
        let res = AppError::ValidationError("missing field `products`".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(res).await["detail"], "missing field `products`");
    }

    #[tokio::test]
    async fn payload_too_large_keeps_detail_body() {
        let res = AppError::PayloadTooLarge("length limit exceeded".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(res).await["detail"], "length limit exceeded");
    }
}
