use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::checklist::CreditPolicy;

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

/// Top-level configuration for the service and the credit rules it applies.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub policy: CreditPolicy,
}

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

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            policy: load_policy()?,
        })
    }
}

fn load_policy() -> Result<CreditPolicy, ConfigError> {
    let defaults = CreditPolicy::default();
    let admission_year = match env::var("LAWCHECK_ADMISSION_YEAR") {
        Ok(value) if is_roc_year(value.trim()) => value.trim().to_string(),
        Ok(value) => return Err(ConfigError::InvalidAdmissionYear { value }),
        Err(_) => defaults.admission_year,
    };

    Ok(CreditPolicy {
        graduation_credits: credit_var("LAWCHECK_GRAD_CREDITS", defaults.graduation_credits)?,
        cap_external: credit_var("LAWCHECK_CAP_EXTERNAL", defaults.cap_external)?,
        cap_language: credit_var("LAWCHECK_CAP_LANG", defaults.cap_language)?,
        cap_cross_total: credit_var("LAWCHECK_CAP_CROSS", defaults.cap_cross_total)?,
        judge_min_credit: credit_var("LAWCHECK_JUDGE_MIN_CREDIT", defaults.judge_min_credit)?,
        admission_year,
    })
}

fn credit_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or(ConfigError::InvalidCredit { name, value: raw })
}

fn is_roc_year(value: &str) -> bool {
    value.len() == 3 && value.bytes().all(|byte| byte.is_ascii_digit())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCredit { name: &'static str, value: String },
    InvalidAdmissionYear { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCredit { name, value } => {
                write!(f, "{name} must be a non-negative number, got '{value}'")
            }
            ConfigError::InvalidAdmissionYear { value } => {
                write!(f, "LAWCHECK_ADMISSION_YEAR must be a three-digit year, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCredit { .. }
            | ConfigError::InvalidAdmissionYear { .. } => None,
        }
    }
}
