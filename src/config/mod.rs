#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_LINKS_URL: &str = "https://it-link.ru/test/images.txt";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CONCURRENT_LOADS: usize = 4;
const MAX_TIMEOUT_SECONDS: u64 = 600;
pub const MAX_CONCURRENT_LOADS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// 合併 TOML 檔與命令列參數後的最終設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub links_url: String,
    pub request_timeout_seconds: u64,
    pub image_timeout_seconds: u64,
    pub concurrent_loads: usize,
    pub format: OutputFormat,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            links_url: DEFAULT_LINKS_URL.to_string(),
            request_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            image_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            concurrent_loads: DEFAULT_CONCURRENT_LOADS,
            format: OutputFormat::Text,
        }
    }
}

impl ConfigProvider for ViewerConfig {
    fn links_url(&self) -> &str {
        &self.links_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_seconds)
    }

    fn concurrent_loads(&self) -> usize {
        self.concurrent_loads
    }
}

impl Validate for ViewerConfig {
    fn validate(&self) -> Result<()> {
        validate_url("links_url", &self.links_url)?;
        validate_range(
            "request_timeout_seconds",
            self.request_timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validate_range(
            "image_timeout_seconds",
            self.image_timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validate_range(
            "concurrent_loads",
            self.concurrent_loads,
            1,
            MAX_CONCURRENT_LOADS,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ViewerError;

    #[test]
    fn test_default_config_is_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.links_url(), DEFAULT_LINKS_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_loads_rejected() {
        let config = ViewerConfig {
            concurrent_loads: 0,
            ..ViewerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_loads_rejected() {
        let config = ViewerConfig {
            concurrent_loads: usize::MAX,
            ..ViewerConfig::default()
        };
        match config.validate() {
            Err(ViewerError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "concurrent_loads")
            }
            other => panic!("expected concurrent_loads to be rejected, got {other:?}"),
        }

        let config = ViewerConfig {
            concurrent_loads: MAX_CONCURRENT_LOADS,
            ..ViewerConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
