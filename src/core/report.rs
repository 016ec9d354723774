use crate::core::TransferOutcome;
use crate::domain::model::TransferStatus;
use chrono::{DateTime, Utc};
use std::fmt;

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Base-1024 size with two decimals. GB is the largest unit.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTransfer {
    pub path: String,
    pub reason: String,
}

/// Running totals fed by the pipeline, one outcome at a time.
#[derive(Debug)]
pub struct SummaryReporter {
    attempted: usize,
    succeeded: usize,
    already_present: usize,
    total_bytes: u64,
    total_rows: usize,
    failed: Vec<FailedTransfer>,
    started_at: DateTime<Utc>,
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryReporter {
    pub fn new() -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            already_present: 0,
            total_bytes: 0,
            total_rows: 0,
            failed: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn record(&mut self, outcome: &TransferOutcome) {
        self.attempted += 1;
        match &outcome.status {
            TransferStatus::Converted {
                output_size_bytes,
                row_count,
            } => {
                self.succeeded += 1;
                self.total_bytes += output_size_bytes;
                self.total_rows += row_count;
            }
            TransferStatus::AlreadyPresent { output_size_bytes } => {
                self.succeeded += 1;
                self.already_present += 1;
                self.total_bytes += output_size_bytes;
            }
            TransferStatus::Failed { error } => self.failed.push(FailedTransfer {
                path: outcome.path.clone(),
                reason: error.clone(),
            }),
        }
    }

    pub fn finish(self) -> Summary {
        Summary {
            attempted: self.attempted,
            succeeded: self.succeeded,
            already_present: self.already_present,
            total_bytes: self.total_bytes,
            total_rows: self.total_rows,
            failed: self.failed,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub attempted: usize,
    /// Includes outputs that were already on disk.
    pub succeeded: usize,
    pub already_present: usize,
    pub total_bytes: u64,
    /// Rows written during this run only.
    pub total_rows: usize,
    pub failed: Vec<FailedTransfer>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Summary {
    pub fn failed_paths(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.path.as_str()).collect()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==================== Summary ====================")?;
        writeln!(f, "Files attempted:   {}", self.attempted)?;
        writeln!(
            f,
            "Successful:        {} ({} already present)",
            self.succeeded, self.already_present
        )?;
        writeln!(f, "Rows converted:    {}", self.total_rows)?;
        writeln!(f, "Total output size: {}", format_bytes(self.total_bytes))?;
        writeln!(
            f,
            "Elapsed:           {:.1}s",
            self.elapsed().num_milliseconds() as f64 / 1000.0
        )?;
        if self.failed.is_empty() {
            write!(f, "Failed files:      none")
        } else {
            writeln!(f, "Failed files:      {}", self.failed.len())?;
            for (i, failure) in self.failed.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                write!(f, "  - {} ({})", failure.path, failure.reason)?;
            }
            Ok(())
        }
    }
}
