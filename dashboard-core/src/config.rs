//! Dashboard configuration loaded from TOML.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! api_base_url = "https://api-nida.meltedcloud.cloud/api"
//! request_timeout_secs = 30
//! page_size = 50
//! max_visible_pages = 7
//! log_level = "info"
//! health_poll_secs = 30
//! roi_refresh_secs = 300
//!
//! [retry]
//! max_attempts = 3
//! initial_delay_ms = 1000
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::{DashboardError, Result};
use crate::retry::RetryPolicy;

pub const DEFAULT_API_BASE_URL: &str = "https://api-nida.meltedcloud.cloud/api";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the REST API, without trailing slash
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Rows requested per table page
    pub page_size: u32,
    /// Paginator width before ellipses kick in
    pub max_visible_pages: u32,
    /// tracing filter directive, e.g. "info" or "sensor_dashboard=debug"
    pub log_level: String,
    /// Sidebar API status refresh period
    pub health_poll_secs: u64,
    /// ROI card reload period
    pub roi_refresh_secs: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            page_size: 50,
            max_visible_pages: 7,
            log_level: "info".to_string(),
            health_poll_secs: 30,
            roi_refresh_secs: 300,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: DashboardConfig = toml::from_str(content)?;
        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(DashboardError::Config("api_base_url must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(DashboardError::Config("page_size must be greater than 0".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(DashboardError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        // 1, ellipsis, window of three, ellipsis, last
        if self.max_visible_pages < 7 {
            return Err(DashboardError::Config("max_visible_pages must be at least 7".into()));
        }
        if self.health_poll_secs == 0 {
            return Err(DashboardError::Config("health_poll_secs must be greater than 0".into()));
        }
        if self.roi_refresh_secs == 0 {
            return Err(DashboardError::Config("roi_refresh_secs must be greater than 0".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(DashboardError::Config("retry.max_attempts must be at least 1".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn health_poll_interval(&self) -> Duration {
        Duration::from_secs(self.health_poll_secs)
    }

    pub fn roi_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.roi_refresh_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.initial_delay_ms),
        )
    }
}
