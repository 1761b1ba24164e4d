use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_DEMO_EMAIL: &str = "demo@margros.in";
const DEFAULT_DEMO_PASSWORD: &str = "demo@123";
const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEV_DEFAULT_SESSION_SECRET: &str =
    "dev-only-session-secret-for-local-pos-terminals-9f3c2a7b";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment (development, test, staging, production)
    #[validate(length(min = 1))]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback
    #[serde(default)]
    pub cors_allow_any_origin: bool,

    /// CORS: allow credentials
    #[serde(default)]
    pub cors_allow_credentials: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,

    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,

    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    /// Secret used to sign the `admin_session` cookie
    #[validate(length(min = 32))]
    pub session_secret: String,

    /// Lifetime of a dashboard session in seconds (default 7 days)
    #[serde(default = "default_session_max_age_secs")]
    #[validate(range(min = 60, max = 2_592_000))]
    pub session_max_age_secs: u64,

    /// Mark the session cookie `Secure`; defaults to on outside development
    #[serde(default)]
    pub session_cookie_secure: Option<bool>,

    /// Demo login identity
    #[serde(default = "default_demo_email")]
    #[validate(email)]
    pub demo_email: String,

    #[serde(default = "default_demo_password")]
    #[validate(length(min = 1))]
    pub demo_password: String,

    /// Tax applied to every bill (0.0 - 1.0)
    #[serde(default = "default_tax_rate")]
    #[validate(custom = "validate_tax_rate")]
    pub default_tax_rate: f64,

    #[serde(default = "default_currency")]
    #[validate(length(equal = 3))]
    pub currency: String,

    /// OpenAI-compatible chat completions endpoint used for narrative insights
    #[serde(default = "default_llm_api_url")]
    #[validate(url)]
    pub llm_api_url: String,

    /// Narrative insights are disabled when this is unset
    #[serde(default)]
    pub llm_api_key: Option<String>,

    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    #[serde(default = "default_llm_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub llm_timeout_secs: u64,

    #[serde(default = "default_llm_max_tokens")]
    pub llm_max_tokens: u32,

    #[serde(default = "default_llm_temperature")]
    #[validate(range(min = 0.0, max = 2.0))]
    pub llm_temperature: f64,

    /// Default page size for list endpoints
    #[serde(default = "default_api_page_size")]
    pub api_default_page_size: u64,

    /// Upper bound applied to `limit` on list endpoints
    #[serde(default = "default_api_max_page_size")]
    pub api_max_page_size: u64,
}

impl AppConfig {
    /// Creates a configuration with defaults for everything except the
    /// connection and environment settings.
    pub fn new(
        database_url: String,
        session_secret: String,
        host: String,
        port: u16,
        environment: String,
    ) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            cors_allow_credentials: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
            session_secret,
            session_max_age_secs: default_session_max_age_secs(),
            session_cookie_secure: None,
            demo_email: default_demo_email(),
            demo_password: default_demo_password(),
            default_tax_rate: default_tax_rate(),
            currency: default_currency(),
            llm_api_url: default_llm_api_url(),
            llm_api_key: None,
            llm_model: default_llm_model(),
            llm_timeout_secs: default_llm_timeout_secs(),
            llm_max_tokens: default_llm_max_tokens(),
            llm_temperature: default_llm_temperature(),
            api_default_page_size: default_api_page_size(),
            api_max_page_size: default_api_max_page_size(),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Checks if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Checks if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Returns true if explicit CORS origins are configured
    pub fn has_cors_allowed_origins(&self) -> bool {
        self.cors_allowed_origins
            .as_ref()
            .map(|raw| raw.split(',').any(|origin| !origin.trim().is_empty()))
            .unwrap_or(false)
    }

    /// Whether we should fall back to permissive CORS
    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    /// `Secure` flag for the session cookie
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
            .unwrap_or_else(|| self.is_production())
    }

    pub fn session_max_age(&self) -> Duration {
        Duration::from_secs(self.session_max_age_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Clamp a requested page size to the configured bounds
    pub fn clamp_page_size(&self, requested: u64) -> u64 {
        if requested == 0 {
            self.api_default_page_size
        } else {
            requested.min(self.api_max_page_size)
        }
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.should_allow_permissive_cors() && !self.has_cors_allowed_origins() {
            let mut err = ValidationError::new("cors_allowed_origins_required");
            err.message = Some(
                "Set APP__CORS_ALLOWED_ORIGINS for non-development environments or explicitly opt-in via APP__CORS_ALLOW_ANY_ORIGIN=true".into(),
            );
            errors.add("cors_allowed_origins", err);
        }

        if !self.is_development() && self.session_secret.trim() == DEV_DEFAULT_SESSION_SECRET {
            let mut err = ValidationError::new("session_secret_default_dev");
            err.message = Some(
                "The bundled development session secret must not be used outside development. Set APP__SESSION_SECRET."
                    .into(),
            );
            errors.add("session_secret", err);
        }

        if self.api_default_page_size == 0 || self.api_default_page_size > self.api_max_page_size
        {
            let mut err = ValidationError::new("api_default_page_size");
            err.message =
                Some("api_default_page_size must be between 1 and api_max_page_size".into());
            errors.add("api_default_page_size", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}
fn default_session_max_age_secs() -> u64 {
    60 * 60 * 24 * 7
}
fn default_demo_email() -> String {
    DEFAULT_DEMO_EMAIL.to_string()
}
fn default_demo_password() -> String {
    DEFAULT_DEMO_PASSWORD.to_string()
}
fn default_tax_rate() -> f64 {
    0.08
}
fn default_currency() -> String {
    "INR".to_string()
}
fn default_llm_api_url() -> String {
    DEFAULT_LLM_API_URL.to_string()
}
fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}
fn default_llm_timeout_secs() -> u64 {
    30
}
fn default_llm_max_tokens() -> u32 {
    1024
}
fn default_llm_temperature() -> f64 {
    0.7
}
fn default_api_page_size() -> u64 {
    20
}
fn default_api_max_page_size() -> u64 {
    100
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_tax_rate(rate: f64) -> Result<(), ValidationError> {
    if !rate.is_finite() || rate < 0.0 || rate > 1.0 {
        let mut err = ValidationError::new("default_tax_rate");
        err.message = Some("default_tax_rate must be a finite value between 0.0 and 1.0".into());
        return Err(err);
    }
    Ok(())
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("restaurant_pos_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    load_config_from(Path::new(CONFIG_DIR))
}

/// Same as [`load_config`] with an explicit config directory.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let dir = config_dir.display();
    let config = Config::builder()
        .set_default("database_url", "sqlite://restaurant_pos.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", run_env.as_str())?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("session_secret", DEV_DEFAULT_SESSION_SECRET)?
        .add_source(File::with_name(&format!("{}/default", dir)).required(false))
        .add_source(File::with_name(&format!("{}/{}", dir, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration security validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "a-production-grade-session-secret-0123456789".into(),
            "127.0.0.1".into(),
            8080,
            "production".into(),
        )
    }

    #[test]
    fn non_dev_requires_cors_origins() {
        let cfg = base_config();
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn non_dev_allows_override_flag() {
        let mut cfg = base_config();
        cfg.cors_allow_any_origin = true;
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn non_dev_rejects_bundled_session_secret() {
        let mut cfg = base_config();
        cfg.cors_allowed_origins = Some("https://pos.example.com".into());
        cfg.session_secret = DEV_DEFAULT_SESSION_SECRET.into();
        let errors = cfg.validate_additional_constraints().unwrap_err();
        assert!(errors.field_errors().contains_key("session_secret"));
    }

    #[test]
    fn development_allows_permissive_by_default() {
        let mut cfg = base_config();
        cfg.environment = "development".into();
        cfg.session_secret = DEV_DEFAULT_SESSION_SECRET.into();
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn tax_rate_outside_unit_interval_is_rejected() {
        let mut cfg = base_config();
        cfg.default_tax_rate = 1.5;
        let errors = cfg.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("default_tax_rate"));
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let mut cfg = base_config();
        cfg.session_secret = "too-short".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn cookie_secure_follows_environment_unless_overridden() {
        let mut cfg = base_config();
        assert!(cfg.session_cookie_secure());
        cfg.environment = "development".into();
        assert!(!cfg.session_cookie_secure());
        cfg.session_cookie_secure = Some(true);
        assert!(cfg.session_cookie_secure());
    }

    #[test]
    fn page_size_is_clamped() {
        let cfg = base_config();
        assert_eq!(cfg.clamp_page_size(0), 20);
        assert_eq!(cfg.clamp_page_size(5), 5);
        assert_eq!(cfg.clamp_page_size(10_000), 100);
    }
}

#[cfg(test)]
mod loading_tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn loads_defaults_and_file_overrides() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(
            file,
            r#"
            database_url = "sqlite::memory:"
            port = 9090
            default_tax_rate = 0.05
            "#
        )
        .unwrap();

        let cfg = load_config_from(dir.path()).unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert!((cfg.default_tax_rate - 0.05).abs() < f64::EPSILON);
        assert_eq!(cfg.demo_email, "demo@margros.in");
        assert_eq!(cfg.session_max_age_secs, 604_800);
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let dir = TempDir::new().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(file, r#"log_level = "chatty""#).unwrap();

        let result = load_config_from(dir.path());
        assert!(matches!(result, Err(AppConfigError::Validation(_))));
    }
}
