use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a receipt payload.
///
/// Nothing is retained from a failed fetch; the caller reports it and the
/// user starts over.
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("failed to read receipt from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed receipt payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("receipt source unavailable: {0}")]
    Unavailable(String),
}
