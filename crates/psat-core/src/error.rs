//! Error type for the edges of the pipeline.
//!
//! The derivation pipeline itself never fails; these errors only come from
//! decoding external input.

/// Error type for psat-core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid tab state: {0}")]
    InvalidTabState(#[from] serde_json::Error),
    #[error("Invalid filter selection '{0}': expected key=value")]
    InvalidFilterSelection(String),
    #[error("Unknown filter key: {0}")]
    UnknownFilterKey(String),
    #[error("Unknown Privacy Sandbox API key: {0}")]
    UnknownApiKey(String),
    #[error("Invalid public suffix list: {0}")]
    InvalidSuffixList(String),
}

pub type Result<T> = std::result::Result<T, Error>;
