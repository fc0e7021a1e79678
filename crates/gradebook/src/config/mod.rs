use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUIRED_CREDITS: u32 = 140;
const DEFAULT_CERTIFICATE_PREFIX: &str = "TR";

/// Deployment stage. Unknown values fall back to development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub grading: GradingConfig,
}

impl AppConfig {
    /// Reads `.env` (when present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = optional("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or_default();

        let port = match optional("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host: optional("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: optional("APP_LOG_LEVEL")
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            grading: GradingConfig::from_env()?,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok()
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    value: self.host.clone(),
                    source,
                })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Institution-wide grading policy consumed by the transcript assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingConfig {
    /// Credits needed to graduate; drives `remaining_credits`.
    pub required_credits: u32,
    pub certificate_prefix: String,
}

impl GradingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let required_credits = match optional("GRADING_REQUIRED_CREDITS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidRequiredCredits { value: raw })?,
            None => DEFAULT_REQUIRED_CREDITS,
        };

        let certificate_prefix = match optional("GRADING_CERTIFICATE_PREFIX") {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::EmptyCertificatePrefix),
            Some(raw) => raw.trim().to_string(),
            None => DEFAULT_CERTIFICATE_PREFIX.to_string(),
        };

        Ok(Self {
            required_credits,
            certificate_prefix,
        })
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            required_credits: DEFAULT_REQUIRED_CREDITS,
            certificate_prefix: DEFAULT_CERTIFICATE_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16, got '{value}'")]
    InvalidPort { value: String },
    #[error("APP_HOST '{value}' is not an IPv4 or IPv6 address")]
    InvalidHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("GRADING_REQUIRED_CREDITS must be a non-negative integer, got '{value}'")]
    InvalidRequiredCredits { value: String },
    #[error("GRADING_CERTIFICATE_PREFIX must not be blank")]
    EmptyCertificatePrefix,
}
