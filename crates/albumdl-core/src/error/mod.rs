//! Error taxonomy for the download pipeline.
//!
//! Each stage has its own error type so the orchestrator can decide, by type,
//! whether a failure ends the run, aborts iteration, or only skips one track.

mod classify;

pub use classify::{classify_curl_error, TransportKind};

use crate::model::{AlbumId, TrackId};
use std::path::PathBuf;
use thiserror::Error;

/// Album id argument could not be accepted. Raised before any network call.
#[derive(Debug, Error)]
#[error("invalid album id {input:?}: {reason}")]
pub struct ValidationError {
    pub input: String,
    pub reason: &'static str,
}

impl ValidationError {
    pub(crate) fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Transport-level failure talking to the catalog or the audio host.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("{kind}: {message}")]
    Transport { kind: TransportKind, message: String },
    #[error("HTTP {0}")]
    Http(u32),
}

impl From<curl::Error> for NetworkError {
    fn from(e: curl::Error) -> Self {
        NetworkError::Transport {
            kind: classify_curl_error(&e),
            message: e.to_string(),
        }
    }
}

/// Track list retrieval failed. Always fatal for the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("album {0} not found")]
    NotFound(AlbumId),
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
    #[error("malformed track list response: {0}")]
    Decode(String),
    #[error("catalog refused track list (ret={code}): {message}")]
    Service { code: i64, message: String },
}

/// Audio address resolution failed. Aborts the remaining tracks.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("track {0} unknown to the catalog")]
    UnknownTrack(TrackId),
    #[error("track {0} has no playable audio")]
    Unavailable(TrackId),
    #[error("catalog refused audio address (ret={code}): {message}")]
    Service { code: i64, message: String },
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
    #[error("malformed audio address response: {0}")]
    Decode(String),
}

/// Downloading one track failed. The run continues with the next track.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
    #[error("refusing to write outside output root: {0}")]
    UnsafePath(PathBuf),
}

impl DownloadError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloadError::Write {
            path: path.into(),
            source,
        }
    }
}

/// The single error that ends a run before any track is attempted.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
