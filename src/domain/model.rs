use serde::{Deserialize, Serialize};

pub const INPUT_EXTENSION: &str = ".jsonl";
pub const OUTPUT_EXTENSION: &str = ".csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    #[serde(other)]
    Other,
}

/// One item of a remote tree listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub size: Option<u64>,
}

impl CatalogEntry {
    pub fn is_downloadable(&self) -> bool {
        self.kind == EntryKind::File && self.path.ends_with(INPUT_EXTENSION)
    }
}

/// One decoded JSON Lines object. Field order follows the source line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(data: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data }
    }
}

/// Rows of one input file with the union of their fields as columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    Converted { output_size_bytes: u64, row_count: usize },
    AlreadyPresent { output_size_bytes: u64 },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub path: String,
    pub status: TransferStatus,
}

impl TransferOutcome {
    pub fn converted(path: &str, output_size_bytes: u64, row_count: usize) -> Self {
        Self {
            path: path.to_string(),
            status: TransferStatus::Converted {
                output_size_bytes,
                row_count,
            },
        }
    }

    pub fn already_present(path: &str, output_size_bytes: u64) -> Self {
        Self {
            path: path.to_string(),
            status: TransferStatus::AlreadyPresent { output_size_bytes },
        }
    }

    pub fn failed(path: &str, error: impl ToString) -> Self {
        Self {
            path: path.to_string(),
            status: TransferStatus::Failed {
                error: error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self.status, TransferStatus::Failed { .. })
    }

    pub fn output_size_bytes(&self) -> Option<u64> {
        match self.status {
            TransferStatus::Converted {
                output_size_bytes, ..
            }
            | TransferStatus::AlreadyPresent { output_size_bytes } => Some(output_size_bytes),
            TransferStatus::Failed { .. } => None,
        }
    }

    /// Unknown for outputs that were already on disk.
    pub fn row_count(&self) -> Option<usize> {
        match self.status {
            TransferStatus::Converted { row_count, .. } => Some(row_count),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            TransferStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Output file name for a listed path: last component, `.jsonl` swapped for `.csv`.
pub fn output_file_name(path: &str) -> String {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = file_name.strip_suffix(INPUT_EXTENSION).unwrap_or(file_name);
    format!("{}{}", stem, OUTPUT_EXTENSION)
}
