//! Error types for loading graph data.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the data-fetch collaborator. All of them are recoverable:
/// the viewer turns them into an error state with a retry action.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid graph JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected graph payload: {0}")]
    Shape(String),

    #[error("graph load worker disconnected")]
    Disconnected,
}
