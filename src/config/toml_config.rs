use crate::core::ConfigProvider;
use crate::domain::ports::DEFAULT_USER_AGENT;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_base_url, validate_path, validate_positive_number, validate_range, validate_url,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub listing_url: String,
    pub download_base_url: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadConfig {
    pub max_retries: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub pause_millis: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./output".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATASET_TOKEN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn listing_url(&self) -> &str {
        &self.source.listing_url
    }

    fn download_base_url(&self) -> &str {
        &self.source.download_base_url
    }

    fn output_dir(&self) -> &str {
        &self.output.directory
    }

    fn max_retries(&self) -> u32 {
        self.download.max_retries.unwrap_or(3)
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.download.retry_delay_seconds.unwrap_or(5))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(30))
    }

    fn pause_between_files(&self) -> Duration {
        Duration::from_millis(self.download.pause_millis.unwrap_or(1000))
    }

    fn user_agent(&self) -> &str {
        self.source.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source.listing_url", &self.source.listing_url)?;
        validate_base_url("source.download_base_url", &self.source.download_base_url)?;
        validate_path("output.directory", &self.output.directory)?;
        validate_positive_number("download.max_retries", self.max_retries() as usize, 1)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validate_range("source.timeout_seconds", timeout, 1, 3600)?;
        }
        if let Some(level) = self.log_level() {
            const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
            if !LEVELS.contains(&level) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "monitoring.log_level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", LEVELS.join(", ")),
                });
            }
        }
        Ok(())
    }
}
