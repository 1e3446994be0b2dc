use crate::config::toml_config::TomlConfig;
use crate::config::{OutputFormat, ViewerConfig};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "link-viewer")]
#[command(about = "Fetch an image link list, load every image and walk the loaded ones")]
pub struct CliConfig {
    /// URL of the newline-delimited link list
    #[arg(long)]
    pub links_url: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub concurrent_loads: Option<usize>,

    /// Timeout for the link list and for each image request
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Open the viewer at this index after loading and print the swipe order
    #[arg(long)]
    pub start: Option<usize>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 先讀 TOML 檔（若有），再以命令列參數覆蓋
    pub fn resolve(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.into_viewer_config(),
            None => ViewerConfig::default(),
        };

        if let Some(url) = &self.links_url {
            config.links_url = url.clone();
        }
        if let Some(loads) = self.concurrent_loads {
            config.concurrent_loads = loads;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.request_timeout_seconds = timeout;
            config.image_timeout_seconds = timeout;
        }
        if let Some(format) = self.format {
            config.format = format;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_flags() {
        let cli = CliConfig::parse_from(["link-viewer"]);
        assert_eq!(cli.resolve().unwrap(), ViewerConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"[source]\nendpoint = \"https://file.example.com/a.txt\"\n[loader]\nconcurrent_loads = 3\n",
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "link-viewer",
            "--config",
            path.as_str(),
            "--concurrent-loads",
            "6",
            "--format",
            "json",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.links_url, "https://file.example.com/a.txt");
        assert_eq!(config.concurrent_loads, 6);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let cli = CliConfig::parse_from(["link-viewer", "--config", "/nonexistent/viewer.toml"]);
        assert!(cli.resolve().is_err());
    }
}
