#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use room_image_service::config::DEFAULT_ALLOWED_ORIGINS;
use room_image_service::services::providers::mock::MockImageProvider;
use room_image_service::services::ImageProvider;
use room_image_service::startup::build_router;
use room_image_service::{AppState, ImageDefaults};
use service_core::middleware::{FixedWindowLimiter, RateLimitState, SharedRateLimiter};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const CLIENT_ADDR: &str = "203.0.113.7:51000";
pub const GENERATE_PATH: &str = "/generate-virtual-room-image";
/// Window long enough that no test straddles a boundary.
pub const LONG_PERIOD_SECS: u64 = 1_000_000_000;

pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockImageProvider>,
    pub limiter: SharedRateLimiter,
}

impl TestApp {
    pub fn new(provider: MockImageProvider) -> Self {
        Self::with_rate_limit(provider, 100, LONG_PERIOD_SECS)
    }

    pub fn with_rate_limit(provider: MockImageProvider, limit: u32, period_secs: u64) -> Self {
        let provider = Arc::new(provider);
        let dyn_provider: Arc<dyn ImageProvider> = provider.clone();
        Self::with_image_provider(
            dyn_provider,
            FixedWindowLimiter::shared(limit, period_secs),
            provider,
        )
    }

    /// Router around an arbitrary provider; `mock` is kept for request assertions.
    pub fn with_image_provider(
        image_provider: Arc<dyn ImageProvider>,
        limiter: SharedRateLimiter,
        mock: Arc<MockImageProvider>,
    ) -> Self {
        let state = AppState::new(
            image_provider,
            ImageDefaults {
                model: "dall-e-2".to_string(),
                size: "512x512".to_string(),
            },
        );
        let rate_limit = RateLimitState {
            limiter: limiter.clone(),
            trust_forwarded_for: false,
        };
        let origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();

        Self {
            router: build_router(state, rate_limit, &origins),
            provider: mock,
            limiter,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: body.to_vec(),
        }
    }

    pub async fn post_products(&self, body: &str) -> TestResponse {
        self.send(json_request(GENERATE_PATH, body, CLIENT_ADDR)).await
    }

    pub async fn get_from(&self, uri: &str, client: &str) -> TestResponse {
        self.send(request_from(Method::GET, uri, Body::empty(), client))
            .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Request carrying the peer address the server would see on a real socket.
pub fn request_from(method: Method, uri: &str, body: Body, client: &str) -> Request<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    let addr: SocketAddr = client.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

pub fn json_request(uri: &str, body: &str, client: &str) -> Request<Body> {
    let mut request = request_from(Method::POST, uri, Body::from(body.to_string()), client);
    request
        .headers_mut()
        .insert("content-type", "application/json".parse().unwrap());
    request
}

pub fn assert_security_headers(headers: &HeaderMap) {
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
    assert_eq!(headers["referrer-policy"], "no-referrer");
    assert_eq!(
        headers["strict-transport-security"],
        "max-age=63072000; includeSubDomains; preload"
    );
    assert_eq!(
        headers["content-security-policy"],
        "default-src 'self'; img-src 'self' data:; script-src 'self'; style-src 'self' 'unsafe-inline'"
    );
}
