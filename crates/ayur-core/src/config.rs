//! Configuration types and loading
//!
//! Defaults, then an optional config file, then `AYURSUTRA_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::PortalError;
use crate::pagination::DEFAULT_PAGE_SIZE;

/// Main portal configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PortalConfig {
    /// Backend API configuration
    pub api: ApiConfig,

    /// List screen configuration
    pub listing: ListingConfig,

    /// Mock fallback configuration
    pub mock: MockConfig,

    /// Where the session is persisted between runs
    pub session: SessionConfig,

    /// CSV export configuration
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_seconds: 30,
            user_agent: format!("ayursutra-portal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Page size for most list screens
    pub page_size: u32,
    /// Audit logs and transactions show longer pages
    pub long_page_size: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            long_page_size: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MockConfig {
    /// Serve mock fixtures when the practitioner list cannot be fetched
    pub fallback_enabled: bool,
    /// Artificial latency applied to mock responses
    pub delay_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            delay_ms: 500,
        }
    }
}

impl MockConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    pub storage_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(".ayursutra/session.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl From<config::ConfigError> for PortalError {
    fn from(err: config::ConfigError) -> Self {
        PortalError::Config(err.to_string())
    }
}

impl PortalConfig {
    /// Load defaults, an optional config file, then the environment
    ///
    /// Environment keys use a double underscore between section and field,
    /// e.g. `AYURSUTRA_API__BASE_URL`.
    pub fn load(file: Option<&str>) -> Result<Self, PortalError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix("AYURSUTRA")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let mut config: PortalConfig = settings.try_deserialize()?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from the flat environment variables only
    pub fn from_env() -> Result<Self, PortalError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), PortalError> {
        if let Ok(url) = std::env::var("AYURSUTRA_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(v) = std::env::var("AYURSUTRA_API_TIMEOUT") {
            self.api.timeout_seconds = v
                .parse()
                .map_err(|_| PortalError::Config(format!("invalid AYURSUTRA_API_TIMEOUT: {v}")))?;
        }
        if let Ok(v) = std::env::var("AYURSUTRA_PAGE_SIZE") {
            self.listing.page_size = v
                .parse()
                .map_err(|_| PortalError::Config(format!("invalid AYURSUTRA_PAGE_SIZE: {v}")))?;
        }

        let parse_bool = |v: String| v == "true" || v == "1" || v == "yes";
        if let Ok(v) = std::env::var("AYURSUTRA_MOCK_FALLBACK") {
            self.mock.fallback_enabled = parse_bool(v);
        }
        if let Ok(v) = std::env::var("AYURSUTRA_MOCK_DELAY_MS") {
            self.mock.delay_ms = v
                .parse()
                .map_err(|_| PortalError::Config(format!("invalid AYURSUTRA_MOCK_DELAY_MS: {v}")))?;
        }
        if let Ok(path) = std::env::var("AYURSUTRA_SESSION_FILE") {
            self.session.storage_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("AYURSUTRA_EXPORT_DIR") {
            self.export.directory = PathBuf::from(dir);
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<(), PortalError> {
        if self.api.base_url.trim().is_empty() {
            return Err(PortalError::Config("api.base_url must not be empty".into()));
        }
        if !(1..=100).contains(&self.listing.page_size) {
            return Err(PortalError::Config(format!(
                "listing.page_size must be between 1 and 100, got {}",
                self.listing.page_size
            )));
        }
        Ok(())
    }
}
