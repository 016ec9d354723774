use crate::utils::error::Result;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("jsonl-harvest/", env!("CARGO_PKG_VERSION"));

/// Destination for converted tables, addressed by output file name.
pub trait Storage: Send + Sync {
    /// Creates the destination if needed. Failure here aborts the run.
    fn ensure_ready(&self) -> impl Future<Output = Result<()>> + Send;

    /// Size of an existing output, `None` when it has not been produced yet.
    fn existing_size(&self, name: &str) -> impl Future<Output = Result<Option<u64>>> + Send;

    /// Writes the whole file and returns the number of bytes on disk.
    fn write_file(&self, name: &str, data: &[u8]) -> impl Future<Output = Result<u64>> + Send;

    fn location(&self, name: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn listing_url(&self) -> &str;
    fn download_base_url(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn max_retries(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn pause_between_files(&self) -> Duration;

    fn user_agent(&self) -> &str {
        DEFAULT_USER_AGENT
    }
}

/// Gate between listing and transferring.
pub trait Confirm {
    fn confirm(&self, paths: &[String]) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&[String]) -> bool,
{
    fn confirm(&self, paths: &[String]) -> bool {
        self(paths)
    }
}
