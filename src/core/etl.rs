use crate::adapters::http::HttpClient;
use crate::core::catalog::CatalogLister;
use crate::core::pipeline::{TransferPipeline, TransferSettings};
use crate::core::report::{Summary, SummaryReporter};
use crate::core::{ConfigProvider, Confirm, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug)]
pub enum RunOutcome {
    /// The listing was empty or could not be fetched.
    NothingToDo,
    Declined { files: usize },
    Completed(Summary),
}

/// List, confirm, transfer, report.
pub struct EtlEngine<C: ConfigProvider> {
    config: C,
    monitor: SystemMonitor,
}

impl<C: ConfigProvider> EtlEngine<C> {
    pub fn new(config: C) -> Self {
        Self::new_with_monitoring(config, false)
    }

    pub fn new_with_monitoring(config: C, monitor_enabled: bool) -> Self {
        Self {
            config,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Lists downloadable files without transferring anything.
    pub async fn discover(&self) -> Result<Vec<String>> {
        let client = HttpClient::from_config(&self.config)?;
        Ok(CatalogLister::new(&client)
            .list_files(self.config.listing_url())
            .await)
    }

    pub async fn run<S: Storage>(&mut self, storage: S, confirm: &dyn Confirm) -> Result<RunOutcome> {
        let client = HttpClient::from_config(&self.config)?;

        println!("Listing files from {}", self.config.listing_url());
        let files = CatalogLister::new(&client)
            .list_files(self.config.listing_url())
            .await;
        self.monitor.log_stats("Listing");

        if files.is_empty() {
            println!("No downloadable files found, nothing to do.");
            return Ok(RunOutcome::NothingToDo);
        }

        if !confirm.confirm(&files) {
            println!("Aborted, no files were transferred.");
            tracing::info!("User declined transfer of {} files", files.len());
            return Ok(RunOutcome::Declined { files: files.len() });
        }

        let pipeline = TransferPipeline::new(&client, storage, TransferSettings::from_config(&self.config));
        let mut reporter = SummaryReporter::new();
        pipeline.process(&files, &mut reporter).await?;
        self.monitor.log_stats("Transfer");

        let summary = reporter.finish();
        println!("{}", summary);
        tracing::info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed.len(),
            "Run finished"
        );

        Ok(RunOutcome::Completed(summary))
    }
}
