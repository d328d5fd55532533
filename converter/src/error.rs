//! @ai:module:intent Define error types for the annotation converter
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all conversion operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Attribute `{attribute}` of @{annotation} on {declaration} has no mapping")]
    UnmappedAttribute {
        annotation: String,
        attribute: String,
        declaration: String,
    },

    #[error("Attribute `{attribute}` of @{annotation} on {declaration} must be {expected}")]
    UnsupportedValue {
        annotation: String,
        attribute: String,
        expected: &'static str,
        declaration: String,
    },

    #[error("Unsupported response container `{container}` on {declaration}")]
    UnsupportedContainer {
        container: String,
        declaration: String,
    },

    #[error("Conversion cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
