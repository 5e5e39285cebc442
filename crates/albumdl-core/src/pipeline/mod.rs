//! Three-stage album pipeline: list fetch → address resolve → download.
//!
//! The orchestrator only depends on the capability traits below; the catalog
//! client and file downloader implement them for real runs, tests plug in fakes.

mod run;
mod state;

pub use run::{Orchestrator, RunEvent, RunReport};
pub use state::{Event, RunState, Tally, Terminal};

use crate::error::{DownloadError, FetchError, ResolutionError};
use crate::model::{AlbumId, AudioAddress, Track, TrackId};
use std::path::PathBuf;

/// Successful download: where the file landed and what was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTrack {
    pub path: PathBuf,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the file content.
    pub sha256: String,
}

/// Retrieves the ordered track list of an album.
pub trait TrackListFetcher {
    fn fetch_tracks(&self, album_id: AlbumId) -> Result<Vec<Track>, FetchError>;
}

/// Resolves a track id to a fetchable audio URL.
pub trait AudioAddressResolver {
    fn resolve(&self, track_id: TrackId) -> Result<AudioAddress, ResolutionError>;
}

/// Streams one audio address to a file named from the track's titles.
pub trait TrackDownloader {
    fn download(&self, address: &AudioAddress, track: &Track) -> Result<SavedTrack, DownloadError>;
}

impl<T: TrackListFetcher + ?Sized> TrackListFetcher for &T {
    fn fetch_tracks(&self, album_id: AlbumId) -> Result<Vec<Track>, FetchError> {
        (**self).fetch_tracks(album_id)
    }
}

impl<T: AudioAddressResolver + ?Sized> AudioAddressResolver for &T {
    fn resolve(&self, track_id: TrackId) -> Result<AudioAddress, ResolutionError> {
        (**self).resolve(track_id)
    }
}

impl<T: TrackDownloader + ?Sized> TrackDownloader for &T {
    fn download(&self, address: &AudioAddress, track: &Track) -> Result<SavedTrack, DownloadError> {
        (**self).download(address, track)
    }
}
