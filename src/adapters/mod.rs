// Adapters layer: concrete implementations for external systems (http, storage, terminal prompt).

pub mod http;
pub mod prompt;
pub mod storage;
