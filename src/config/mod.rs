pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_base_url, validate_path, validate_positive_number, validate_range, validate_url,
    Validate,
};
use std::time::Duration;

#[cfg(feature = "cli")]
use clap::Parser;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "jsonl-harvest"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Download JSON Lines files from a dataset API and convert them to CSV")
)]
pub struct CliConfig {
    /// Tree listing endpoint returning `[{"path": ..., "type": ...}]`
    #[cfg_attr(feature = "cli", arg(long))]
    pub listing_url: String,

    /// Prefix joined with each listed path to form its download URL
    #[cfg_attr(feature = "cli", arg(long))]
    pub download_base_url: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_dir: String,

    /// Attempts per file, including the first one
    #[cfg_attr(feature = "cli", arg(long, default_value = "3"))]
    pub max_retries: u32,

    #[cfg_attr(feature = "cli", arg(long, default_value = "5"))]
    pub retry_delay_seconds: u64,

    #[cfg_attr(feature = "cli", arg(long, default_value = "30"))]
    pub timeout_seconds: u64,

    /// Pause after each converted file
    #[cfg_attr(feature = "cli", arg(long, default_value = "1000"))]
    pub pause_millis: u64,

    /// Skip the confirmation prompt
    #[cfg_attr(feature = "cli", arg(short, long))]
    pub yes: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON"))]
    pub log_json: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log CPU and memory usage"))]
    pub monitor: bool,
}

impl CliConfig {
    pub fn new(listing_url: impl Into<String>, download_base_url: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            download_base_url: download_base_url.into(),
            output_dir: output_dir.into(),
            max_retries: 3,
            retry_delay_seconds: 5,
            timeout_seconds: 30,
            pause_millis: 1000,
            yes: false,
            verbose: false,
            log_json: false,
            monitor: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn download_base_url(&self) -> &str {
        &self.download_base_url
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn pause_between_files(&self) -> Duration {
        Duration::from_millis(self.pause_millis)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("listing_url", &self.listing_url)?;
        validate_base_url("download_base_url", &self.download_base_url)?;
        validate_path("output_dir", &self.output_dir)?;
        validate_positive_number("max_retries", self.max_retries as usize, 1)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 3600)?;
        Ok(())
    }
}
