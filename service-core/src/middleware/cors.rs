use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Credentialed CORS for an explicit origin list; any method and header.
///
/// Browsers refuse credentialed wildcards, so methods and headers are
/// mirrored from the preflight and `*` entries in the list are dropped.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .filter_map(|o| {
            if o == "*" {
                tracing::error!("Wildcard CORS origin is not allowed with credentials. Skipping.");
                return None;
            }
            match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
