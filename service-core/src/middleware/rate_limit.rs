use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tokio::task::JoinHandle;

pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Fixed-window limiter shared by every connection.
pub type SharedRateLimiter = Arc<FixedWindowLimiter>;

/// Resolved caller address, inserted into request extensions for inner layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct WindowKey {
    ip: IpAddr,
    window: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: u64 },
}

/// Counts requests per `(client ip, floor(epoch / period))`.
///
/// Windows do not slide: a client can spend its whole quota at the end of
/// one window and again at the start of the next. Stale windows are only
/// dropped by [`FixedWindowLimiter::sweep`], so run [`spawn_sweeper`] in
/// long-lived processes.
///
/// [`spawn_sweeper`]: FixedWindowLimiter::spawn_sweeper
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: u32,
    period_secs: u64,
    windows: DashMap<WindowKey, u32>,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, period_secs: u64) -> Self {
        Self {
            limit,
            period_secs: period_secs.max(1),
            windows: DashMap::new(),
        }
    }

    pub fn shared(limit: u32, period_secs: u64) -> SharedRateLimiter {
        Arc::new(Self::new(limit, period_secs))
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn period_secs(&self) -> u64 {
        self.period_secs
    }

    pub fn check(&self, ip: IpAddr) -> RateLimitDecision {
        self.check_at(ip, epoch_secs())
    }

    /// Count one request from `ip` at `now_secs` unless the window is full.
    /// A rejected request is not counted.
    pub fn check_at(&self, ip: IpAddr, now_secs: u64) -> RateLimitDecision {
        let window = now_secs / self.period_secs;
        // The entry guard holds the shard lock, so compare and increment are atomic.
        let mut count = self.windows.entry(WindowKey { ip, window }).or_insert(0);

        if *count >= self.limit {
            let window_end = (window + 1) * self.period_secs;
            return RateLimitDecision::Limited {
                retry_after: window_end - now_secs,
            };
        }

        *count += 1;
        RateLimitDecision::Allowed {
            remaining: self.limit - *count,
        }
    }

    pub fn sweep(&self) -> usize {
        self.sweep_at(epoch_secs())
    }

    /// Drop every window older than the one containing `now_secs`.
    /// Returns how many were removed.
    pub fn sweep_at(&self, now_secs: u64) -> usize {
        let current = now_secs / self.period_secs;
        let before = self.windows.len();
        self.windows.retain(|key, _| key.window >= current);
        before.saturating_sub(self.windows.len())
    }

    pub fn tracked_windows(&self) -> usize {
        self.windows.len()
    }

    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = limiter.sweep();
                if removed > 0 {
                    tracing::debug!(
                        removed,
                        remaining = limiter.tracked_windows(),
                        "Swept expired rate limit windows"
                    );
                }
            }
        })
    }
}

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Caller address used as the limiter key.
///
/// `X-Forwarded-For` is only honoured when the service sits behind a proxy
/// that sets it; otherwise clients could pick their own key.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_forwarded_for: bool,
) -> Option<IpAddr> {
    let forwarded_ip = trust_forwarded_for
        .then(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        })
        .flatten();

    forwarded_ip.or_else(|| peer.map(|addr| addr.ip()))
}

#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: SharedRateLimiter,
    pub trust_forwarded_for: bool,
}

/// Middleware for IP-based fixed-window rate limiting
pub async fn ip_rate_limit_middleware(
    State(state): State<RateLimitState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    mut request: Request,
    next: Next,
) -> Response {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let Some(ip) = resolve_client_ip(request.headers(), peer, state.trust_forwarded_for) else {
        tracing::warn!("Could not determine IP for rate limiting");
        return next.run(request).await;
    };

    let limit = state.limiter.limit();
    match state.limiter.check(ip) {
        RateLimitDecision::Allowed { remaining } => {
            request.extensions_mut().insert(ClientIp(ip));
            let mut response = next.run(request).await;
            set_quota_headers(&mut response, limit, remaining);
            response
        }
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!(
                ip = %ip,
                path = %request.uri().path(),
                retry_after,
                "Rate limit exceeded"
            );
            let mut response =
                AppError::TooManyRequests("Too many requests".to_string(), Some(retry_after))
                    .into_response();
            set_quota_headers(&mut response, limit, 0);
            response
        }
    }
}

fn set_quota_headers(response: &mut Response, limit: u32, remaining: u32) {
    let headers = response.headers_mut();
    headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(limit));
    headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(remaining));
}
