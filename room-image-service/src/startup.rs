use crate::config::{ProviderKind, ProviderSettings, RoomImageConfig};
use crate::handlers::{generate_virtual_room_image, health_check};
use crate::services::providers::mock::MockImageProvider;
use crate::services::providers::openai::{OpenAiConfig, OpenAiImageProvider};
use crate::services::ImageProvider;
use crate::{AppState, ImageDefaults};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    cors_layer, ip_rate_limit_middleware, request_logging_middleware,
    security_headers_middleware, FixedWindowLimiter, RateLimitState, SharedRateLimiter,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

/// Assemble the request pipeline around the routes.
///
/// Layers run outermost first: security headers, rate limiting, request
/// logging, CORS. The last `.layer` call is the outermost.
pub fn build_router(state: AppState, rate_limit: RateLimitState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route(
            "/generate-virtual-room-image",
            post(generate_virtual_room_image),
        )
        .route("/health", get(health_check))
        .fallback(not_found)
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(from_fn(request_logging_middleware))
        .layer(from_fn_with_state(rate_limit, ip_rate_limit_middleware))
        .layer(from_fn(security_headers_middleware))
}

async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// Construct the configured image provider.
pub fn build_provider(settings: &ProviderSettings) -> Result<Arc<dyn ImageProvider>, AppError> {
    match settings.kind {
        ProviderKind::Mock => {
            tracing::warn!("Using mock image provider; no real images will be generated");
            Ok(Arc::new(MockImageProvider::default()))
        }
        ProviderKind::OpenAi => {
            let api_key = settings.api_key.clone().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("OPENAI_API_KEY is not set"))
            })?;
            let provider = OpenAiImageProvider::new(OpenAiConfig {
                api_key,
                base_url: settings.base_url.clone(),
                timeout: settings.timeout,
            })
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

            tracing::info!(
                model = %settings.model,
                size = %settings.size,
                base_url = %settings.base_url,
                "Initialized OpenAI image provider"
            );
            Ok(Arc::new(provider))
        }
    }
}

/// Application container for the HTTP server.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    limiter: SharedRateLimiter,
    sweep_interval: Duration,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RoomImageConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config.provider)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: RoomImageConfig,
        provider: Arc<dyn ImageProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(
            provider,
            ImageDefaults {
                model: config.provider.model.clone(),
                size: config.provider.size.clone(),
            },
        );

        let limiter =
            FixedWindowLimiter::shared(config.rate_limit.limit, config.rate_limit.period_secs);
        let rate_limit = RateLimitState {
            limiter: limiter.clone(),
            trust_forwarded_for: config.rate_limit.trust_forwarded_for,
        };
        let router = build_router(state, rate_limit, &config.cors.allowed_origins);

        // Port 0 binds a random port, used by tests.
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            rate_limit = config.rate_limit.limit,
            rate_period_secs = config.rate_limit.period_secs,
            "Room image service listening"
        );

        Ok(Self {
            port,
            listener,
            router,
            limiter,
            sweep_interval: config.rate_limit.sweep_interval,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn rate_limiter(&self) -> &SharedRateLimiter {
        &self.limiter
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let sweeper = self.limiter.spawn_sweeper(self.sweep_interval);

        let result = axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        sweeper.abort();

        result.map_err(|e| {
            tracing::error!("HTTP server error: {}", e);
            e
        })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
