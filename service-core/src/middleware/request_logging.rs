use super::rate_limit::ClientIp;
use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use std::{net::SocketAddr, time::Instant};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs a `REQ` line before the inner service runs and a `RES` line after.
///
/// Also propagates `x-request-id` (generated when absent) onto the request
/// and echoes it on the response.
pub async fn request_logging_middleware(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    mut req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        req.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let ip = req
        .extensions()
        .get::<ClientIp>()
        .map(|ClientIp(ip)| ip.to_string())
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        ip = %ip,
        cl = %header_or_dash(req.headers(), header::CONTENT_LENGTH),
        ua = %header_or_dash(req.headers(), header::USER_AGENT),
        "REQ"
    );

    let mut response = next.run(req).await;

    let dur_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        dur_ms = %format!("{:.1}", dur_ms),
        "RES"
    );

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Header value as text, or `-` when absent or not visible ASCII.
fn header_or_dash(headers: &HeaderMap, name: header::HeaderName) -> &str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}
