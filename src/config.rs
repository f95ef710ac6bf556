use crate::error::{AppError, Result};
use crate::models::PasswordScheme;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Document store configuration
    pub store: StoreConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            auth: AuthConfig::default(),
            session: SessionConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> std::result::Result<Self, config::ConfigError> {
        let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: OCCUPANCY__)
            .add_source(
                config::Environment::with_prefix("OCCUPANCY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection URL (memory://, sled://<path>, redis://...)
    pub url: Option<String>,

    /// Logical database name; used as the key prefix on shared backends
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection holding address/occupancy records
    #[serde(default = "default_records_collection")]
    pub records_collection: String,

    /// Collection holding login credentials
    #[serde(default = "default_users_collection")]
    pub users_collection: String,
}

impl StoreConfig {
    /// The configured connection URL, or a configuration error when unset.
    pub fn url(&self) -> Result<&str> {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(AppError::Configuration(
                "store connection URL is not set (OCCUPANCY__STORE__URL)".to_string(),
            )),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            database: default_database(),
            records_collection: default_records_collection(),
            users_collection: default_users_collection(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// How entered passwords are encoded before comparison
    #[serde(default)]
    pub password_scheme: PasswordScheme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Sessions idle longer than this are discarded (seconds)
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Upper bound on live sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,

    /// Mark the cookie Secure (HTTPS-only)
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout(),
            max_sessions: default_max_sessions(),
            secure_cookie: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
            prometheus_enabled: true,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8501
}

fn default_database() -> String {
    "address_data".to_string()
}

fn default_records_collection() -> String {
    "details".to_string()
}

fn default_users_collection() -> String {
    "users".to_string()
}

fn default_cookie_name() -> String {
    "occupancy_session".to_string()
}

fn default_idle_timeout() -> u64 {
    3600
}

fn default_max_sessions() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "occupancy-lookup".to_string()
}

fn default_true() -> bool {
    true
}
