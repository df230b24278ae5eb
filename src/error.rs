use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GeotableError {
    #[error("feature service request failed: {0}")]
    Transport(String),

    #[error("feature service returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("malformed feature service response: {0}")]
    MalformedResponse(String),

    #[error("cannot build spatial table: {0}")]
    Construction(String),

    #[error("no transform from {from} to {to}")]
    UnsupportedTransform { from: String, to: String },

    #[error("unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("batch size must be a positive integer, got {0}")]
    InvalidBatchSize(usize),

    #[error("invalid layer url: {0}")]
    InvalidLayerUrl(String),

    #[error("no layer url given (pass one on the command line or set layer_url in agol-pull.json)")]
    MissingLayerUrl,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
