//! Errors raised while building a catalog or an engine.
//!
//! Classification itself never fails; everything here surfaces at
//! construction time.

use thiserror::Error;

/// Catalog and engine construction errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid weight {weight} for pattern '{pattern}' (must be finite and >= 0)")]
    InvalidWeight { pattern: String, weight: f64 },

    #[error("unknown intent: {0}")]
    UnknownIntent(String),

    #[error("empty phrase in {0} table")]
    EmptyPhrase(&'static str),

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
