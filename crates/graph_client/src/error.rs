use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures while producing a usable access token. All fatal to the calling
/// fetch; there is no retry loop inside the token provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("device flow start failed: provider response did not include a user code")]
    FlowStartFailed,

    #[error("token acquisition failed: {response}")]
    TokenAcquisition { response: String },

    #[error("device flow expired before sign-in was completed")]
    FlowExpired,

    #[error("authentication cancelled")]
    Cancelled,

    #[error("token cache {path:?}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token cache {path:?} is not a valid cache blob: {source}")]
    CacheFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failures while downloading a drive item to disk.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("download failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("writing {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Either side of an authenticated download.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
