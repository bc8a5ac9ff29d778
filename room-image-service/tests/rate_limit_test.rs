mod common;

use axum::http::StatusCode;
use common::{
    assert_security_headers, json_request, TestApp, CLIENT_ADDR, GENERATE_PATH, LONG_PERIOD_SECS,
};
use room_image_service::services::providers::mock::MockImageProvider;

#[tokio::test]
async fn hundred_and_first_request_is_rejected() {
    let app = TestApp::new(MockImageProvider::default());

    for i in 1..=100 {
        let response = app.get_from("/health", CLIENT_ADDR).await;
        assert_eq!(response.status, StatusCode::OK, "request {}", i);
    }

    let response = app.get_from("/health", CLIENT_ADDR).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.json(),
        serde_json::json!({ "detail": "Too many requests" })
    );
    assert!(response.headers.contains_key("retry-after"));
    assert_eq!(response.headers["x-ratelimit-limit"], "100");
    assert_eq!(response.headers["x-ratelimit-remaining"], "0");
    assert_security_headers(&response.headers);
}

#[tokio::test]
async fn other_clients_keep_their_quota() {
    let app = TestApp::with_rate_limit(MockImageProvider::default(), 1, LONG_PERIOD_SECS);

    assert_eq!(app.get_from("/health", CLIENT_ADDR).await.status, StatusCode::OK);
    assert_eq!(
        app.get_from("/health", CLIENT_ADDR).await.status,
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(
        app.get_from("/health", "198.51.100.2:4000").await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn limited_requests_never_reach_the_provider() {
    let app = TestApp::with_rate_limit(MockImageProvider::default(), 2, LONG_PERIOD_SECS);
    let body = r#"{"products": ["desk lamp"]}"#;

    for _ in 0..2 {
        let response = app
            .send(json_request(GENERATE_PATH, body, CLIENT_ADDR))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
    let response = app
        .send(json_request(GENERATE_PATH, body, CLIENT_ADDR))
        .await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(app.provider.requests().len(), 2);
}

#[tokio::test]
async fn allowed_responses_report_remaining_quota() {
    let app = TestApp::with_rate_limit(MockImageProvider::default(), 5, LONG_PERIOD_SECS);

    let response = app.get_from("/health", CLIENT_ADDR).await;

    assert_eq!(response.headers["x-ratelimit-limit"], "5");
    assert_eq!(response.headers["x-ratelimit-remaining"], "4");
    assert_eq!(app.limiter.tracked_windows(), 1);
}
