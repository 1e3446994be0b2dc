use crate::config::{OutputFormat, ViewerConfig};
use crate::utils::error::{Result, ViewerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: Option<SourceConfig>,
    pub loader: Option<LoaderConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub concurrent_loads: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ViewerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LINKS_URL})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ViewerError::ConfigError {
            message: format!("env pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 套用到預設值之上，檔案中沒寫的欄位維持預設
    pub fn into_viewer_config(self) -> ViewerConfig {
        let mut config = ViewerConfig::default();

        if let Some(source) = self.source {
            if let Some(endpoint) = source.endpoint {
                config.links_url = endpoint;
            }
            if let Some(timeout) = source.timeout_seconds {
                config.request_timeout_seconds = timeout;
            }
        }
        if let Some(loader) = self.loader {
            if let Some(loads) = loader.concurrent_loads {
                config.concurrent_loads = loads;
            }
            if let Some(timeout) = loader.timeout_seconds {
                config.image_timeout_seconds = timeout;
            }
        }
        if let Some(format) = self.output.and_then(|output| output.format) {
            config.format = format;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[source]
endpoint = "https://links.example.com/images.txt"
timeout_seconds = 10

[loader]
concurrent_loads = 8
timeout_seconds = 20

[output]
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_viewer_config();

        assert_eq!(config.links_url, "https://links.example.com/images.txt");
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.image_timeout_seconds, 20);
        assert_eq!(config.concurrent_loads, 8);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_sections_keep_defaults() {
        let config = TomlConfig::from_toml_str("[loader]\nconcurrent_loads = 2\n")
            .unwrap()
            .into_viewer_config();

        assert_eq!(config.concurrent_loads, 2);
        assert_eq!(config.links_url, ViewerConfig::default().links_url);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LINK_VIEWER_TEST_ENDPOINT", "https://env.example.com/list.txt");

        let toml_content = r#"
[source]
endpoint = "${LINK_VIEWER_TEST_ENDPOINT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_viewer_config();
        assert_eq!(config.links_url, "https://env.example.com/list.txt");

        std::env::remove_var("LINK_VIEWER_TEST_ENDPOINT");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
[source]
endpoint = "${LINK_VIEWER_SURELY_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_viewer_config();
        assert_eq!(config.links_url, "${LINK_VIEWER_SURELY_UNSET_VAR}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[source\nendpoint = 1").unwrap_err();
        assert!(matches!(err, ViewerError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\nendpoint = \"http://localhost:9000/images.txt\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path())
            .unwrap()
            .into_viewer_config();
        assert_eq!(config.links_url, "http://localhost:9000/images.txt");
    }
}
