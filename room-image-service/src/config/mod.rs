use crate::services::providers::openai::OPENAI_API_BASE;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Origins allowed to call the API from a browser when none are configured.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 7] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:5174",
    "http://127.0.0.1:5174",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
    "https://black-ground-08908641e.1.azurestaticapps.net",
];

#[derive(Debug, Clone)]
pub struct RoomImageConfig {
    pub common: core_config::Config,
    pub provider: ProviderSettings,
    pub rate_limit: RateLimitSettings,
    pub cors: CorsSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(format!("unknown image provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Required for [`ProviderKind::OpenAi`].
    pub api_key: Option<Secret<String>>,
    pub base_url: String,
    /// Model identifier sent with every generation (e.g., dall-e-2).
    pub model: String,
    /// Target size, `WIDTHxHEIGHT`.
    pub size: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    /// Requests allowed per client per window.
    pub limit: u32,
    pub period_secs: u64,
    pub sweep_interval: Duration,
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: String,
    /// When set, logs are also appended to `<dir>/app.log`.
    pub dir: Option<PathBuf>,
}

impl RoomImageConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| std::env::var(key).ok())
    }

    /// Build the service settings from `lookup` (an environment-like source).
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind: ProviderKind = parse_var(&lookup, "IMAGE_PROVIDER", "openai")?;
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(Secret::new);

        if kind == ProviderKind::OpenAi && api_key.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OPENAI_API_KEY is required when IMAGE_PROVIDER is openai"
            )));
        }

        let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        };

        Ok(RoomImageConfig {
            common,
            provider: ProviderSettings {
                kind,
                api_key,
                base_url: get_var(&lookup, "OPENAI_BASE_URL", OPENAI_API_BASE),
                model: get_var(&lookup, "IMAGE_MODEL", "dall-e-2"),
                size: get_var(&lookup, "IMAGE_SIZE", "512x512"),
                timeout: Duration::from_secs(parse_var(
                    &lookup,
                    "IMAGE_REQUEST_TIMEOUT_SECS",
                    "60",
                )?),
            },
            rate_limit: RateLimitSettings {
                limit: parse_var(&lookup, "RATE_LIMIT", "100")?,
                period_secs: parse_var(&lookup, "RATE_PERIOD", "60")?,
                sweep_interval: Duration::from_secs(
                    parse_var::<u64, _>(&lookup, "RATE_LIMIT_SWEEP_SECS", "60")?.max(1),
                ),
                trust_forwarded_for: parse_var(&lookup, "TRUST_FORWARDED_FOR", "false")?,
            },
            cors: CorsSettings { allowed_origins },
            logging: LoggingSettings {
                level: get_var(&lookup, "LOG_LEVEL", "info"),
                dir: lookup("LOG_DIR")
                    .filter(|dir| !dir.trim().is_empty())
                    .map(PathBuf::from),
            },
        })
    }
}

fn get_var<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parse_var<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = get_var(lookup, key, default);
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
