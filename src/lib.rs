pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{http::HttpClient, storage::LocalStorage};
pub use crate::config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::{
    catalog::CatalogLister,
    etl::{EtlEngine, RunOutcome},
    pipeline::{TransferPipeline, TransferSettings},
    report::{format_bytes, Summary, SummaryReporter},
};
pub use crate::utils::error::{EtlError, Result};
