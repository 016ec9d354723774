pub mod catalog;
pub mod convert;
pub mod etl;
pub mod pipeline;
pub mod report;
pub mod retry;

pub use crate::domain::model::{CatalogEntry, Record, Table, TransferOutcome};
pub use crate::domain::ports::{ConfigProvider, Confirm, Storage};
pub use crate::utils::error::Result;
