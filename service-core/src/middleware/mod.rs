//! Request pipeline layers, listed outermost first:
//! security headers, rate limiting, request logging, CORS.

pub mod cors;
pub mod rate_limit;
pub mod request_logging;
pub mod security_headers;

pub use cors::cors_layer;
pub use rate_limit::{
    ClientIp, FixedWindowLimiter, RateLimitDecision, RateLimitState, SharedRateLimiter,
    ip_rate_limit_middleware,
};
pub use request_logging::{REQUEST_ID_HEADER, request_logging_middleware};
pub use security_headers::{SECURITY_HEADERS, security_headers_middleware};
