use crate::adapters::http::HttpClient;
use crate::core::convert::{build_table, write_csv, JsonLinesDecoder, ParsedRecords};
use crate::core::report::{format_bytes, SummaryReporter};
use crate::core::retry::{with_fixed_retry, RetryPolicy};
use crate::core::{ConfigProvider, Storage, TransferOutcome};
use crate::domain::model::output_file_name;
use crate::utils::error::Result;
use futures::StreamExt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub base_download_url: String,
    pub retry: RetryPolicy,
    /// Fixed pause after every freshly converted file.
    pub pause_between_files: Duration,
}

impl TransferSettings {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            base_download_url: config.download_base_url().to_string(),
            retry: RetryPolicy::new(config.max_retries(), config.retry_delay()),
            pause_between_files: config.pause_between_files(),
        }
    }
}

/// Downloads each listed path and stores it as CSV, one file at a time.
pub struct TransferPipeline<'a, S: Storage> {
    client: &'a HttpClient,
    storage: S,
    settings: TransferSettings,
}

impl<'a, S: Storage> TransferPipeline<'a, S> {
    pub fn new(client: &'a HttpClient, storage: S, settings: TransferSettings) -> Self {
        Self {
            client,
            storage,
            settings,
        }
    }

    /// Only an unusable output location is an error; per-file problems end up
    /// in the returned outcomes.
    pub async fn process(
        &self,
        paths: &[String],
        reporter: &mut SummaryReporter,
    ) -> Result<Vec<TransferOutcome>> {
        self.storage.ensure_ready().await?;

        let total = paths.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, path) in paths.iter().enumerate() {
            println!("[{}/{}] {}", index + 1, total, path);
            let outcome = self.process_one(path).await;
            reporter.record(&outcome);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    pub async fn process_one(&self, path: &str) -> TransferOutcome {
        let name = output_file_name(path);
        let location = self.storage.location(&name);

        match self.storage.existing_size(&name).await {
            Ok(Some(size)) => {
                println!("  ⏭️  {} already exists ({}), skipping", location, format_bytes(size));
                tracing::debug!(path, size, "Output already present");
                return TransferOutcome::already_present(path, size);
            }
            Ok(None) => {}
            Err(e) => {
                println!("  ❌ Cannot inspect {}: {}", location, e);
                return TransferOutcome::failed(path, e);
            }
        }

        let url = format!("{}{}", self.settings.base_download_url, path);
        let parsed = match with_fixed_retry(&self.settings.retry, path, |attempt| {
            self.download_records(&url, path, attempt)
        })
        .await
        {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("  ❌ Download failed: {}", e);
                return TransferOutcome::failed(path, e);
            }
        };

        let skipped_lines = parsed.errors.len();
        match self.convert_and_store(&name, parsed).await {
            Ok((size, rows)) => {
                println!(
                    "  💾 Saved {} rows to {} ({}){}",
                    rows,
                    location,
                    format_bytes(size),
                    if skipped_lines > 0 {
                        format!(", {} lines skipped", skipped_lines)
                    } else {
                        String::new()
                    }
                );
                if !self.settings.pause_between_files.is_zero() {
                    tokio::time::sleep(self.settings.pause_between_files).await;
                }
                TransferOutcome::converted(path, size, rows)
            }
            Err(e) => {
                println!("  ❌ Conversion failed: {}", e);
                tracing::error!(path, error = %e, "Conversion failed");
                TransferOutcome::failed(path, e)
            }
        }
    }

    async fn download_records(&self, url: &str, path: &str, attempt: u32) -> Result<ParsedRecords> {
        tracing::debug!(path, attempt, "Downloading {}", url);
        let response = self.client.get(url).await?;

        let mut decoder = JsonLinesDecoder::new(path);
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            decoder.feed(&chunk?);
        }

        Ok(decoder.finish())
    }

    async fn convert_and_store(&self, name: &str, parsed: ParsedRecords) -> Result<(u64, usize)> {
        let table = build_table(parsed.records)?;
        let csv = write_csv(&table)?;
        let size = self.storage.write_file(name, &csv).await?;
        Ok((size, table.row_count()))
    }
}
