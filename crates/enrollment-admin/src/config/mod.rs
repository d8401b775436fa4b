use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub upstream: UpstreamConfig,
}

const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_SESSION_IDLE_MINUTES: u64 = 120;

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let session_idle_minutes = match env::var("APP_SESSION_IDLE_MINUTES") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => return Err(ConfigError::InvalidSessionTimeout),
            },
            Err(_) => DEFAULT_SESSION_IDLE_MINUTES,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_url = env::var("ENROLLMENT_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }
        let token = env::var("ENROLLMENT_API_TOKEN")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let timeout_secs = match env::var("ENROLLMENT_API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        let page_size = match env::var("APP_DEFAULT_PAGE_SIZE") {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidPageSize),
            },
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                session_idle_timeout: Duration::from_secs(session_idle_minutes * 60),
            },
            telemetry: TelemetryConfig { log_level },
            upstream: UpstreamConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                token,
                timeout: Duration::from_secs(timeout_secs),
                page_size,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Wizard sessions untouched for this long are dropped.
    pub session_idle_timeout: Duration,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the external enrollment REST API.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub page_size: u32,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBaseUrl(String),
    InvalidTimeout,
    InvalidPageSize,
    InvalidSessionTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBaseUrl(value) => write!(
                f,
                "ENROLLMENT_API_BASE_URL must start with http:// or https:// (got '{value}')"
            ),
            ConfigError::InvalidTimeout => {
                write!(f, "ENROLLMENT_API_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidPageSize => {
                write!(f, "APP_DEFAULT_PAGE_SIZE must be a positive integer")
            }
            ConfigError::InvalidSessionTimeout => {
                write!(f, "APP_SESSION_IDLE_MINUTES must be a positive number of minutes")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidBaseUrl(_)
            | ConfigError::InvalidTimeout
            | ConfigError::InvalidPageSize
            | ConfigError::InvalidSessionTimeout => None,
        }
    }
}
