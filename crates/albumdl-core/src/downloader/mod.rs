//! Audio downloader: one GET per track, streamed to `<root>/<album>/<title>.<ext>`.
//!
//! Each call owns exactly one part file; it is either renamed into place or
//! removed before the call returns.

mod stream;

pub use stream::stream_to;

use crate::config::DownloadConfig;
use crate::error::DownloadError;
use crate::model::{AudioAddress, Track};
use crate::naming;
use crate::pipeline::{SavedTrack, TrackDownloader};
use crate::storage::PartFile;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

/// Writes tracks under a fixed output root.
///
/// Paths handed out by one downloader are remembered: a later track whose
/// titles map to an already used path gets its track id appended instead of
/// replacing the earlier file. Use one downloader per run.
#[derive(Debug)]
pub struct FileDownloader {
    output_root: PathBuf,
    cfg: DownloadConfig,
    headers: HashMap<String, String>,
    claimed: Mutex<HashSet<PathBuf>>,
}

impl FileDownloader {
    pub fn new(output_root: impl Into<PathBuf>, cfg: DownloadConfig) -> Self {
        Self {
            output_root: output_root.into(),
            cfg,
            headers: HashMap::new(),
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// Request headers for the audio host (e.g. `User-Agent`, `Referer`).
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Final path for a track, ignoring paths claimed earlier; does not touch
    /// the filesystem.
    pub fn target_path(&self, address: &AudioAddress, track: &Track) -> Result<PathBuf, DownloadError> {
        self.path_with_tag(address, track, None)
    }

    fn path_with_tag(
        &self,
        address: &AudioAddress,
        track: &Track,
        tag: Option<&str>,
    ) -> Result<PathBuf, DownloadError> {
        let ext = naming::extension_from_url(address.url())
            .unwrap_or_else(|| self.cfg.default_extension.clone());
        naming::track_path_tagged(&self.output_root, &track.album_title, &track.title, tag, &ext)
            .map_err(DownloadError::UnsafePath)
    }

    /// Picks the track's path and reserves it for the rest of the run.
    fn claim_path(&self, address: &AudioAddress, track: &Track) -> Result<PathBuf, DownloadError> {
        let mut claimed = self.claimed.lock().unwrap_or_else(|e| e.into_inner());
        let mut path = self.target_path(address, track)?;
        if claimed.contains(&path) {
            let id = track.id.to_string();
            path = self.path_with_tag(address, track, Some(&id))?;
            let mut n = 2u32;
            while claimed.contains(&path) {
                let tag = format!("{}_{}", id, n);
                path = self.path_with_tag(address, track, Some(&tag))?;
                n = n.saturating_add(1);
            }
            tracing::info!(track_id = %track.id, path = %path.display(), "title already used in this run, tagging file name");
        }
        claimed.insert(path.clone());
        Ok(path)
    }
}

impl TrackDownloader for FileDownloader {
    fn download(&self, address: &AudioAddress, track: &Track) -> Result<SavedTrack, DownloadError> {
        let final_path = self.claim_path(address, track)?;
        if let Some(parent) = final_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DownloadError::write(parent, e))?;
        }

        let mut part = PartFile::create(&final_path)
            .map_err(|e| DownloadError::write(crate::storage::temp_path(&final_path), e))?;
        let bytes = stream_to(address.as_str(), &self.headers, &self.cfg, &mut part)?;
        tracing::debug!(path = %final_path.display(), bytes, "stream complete, finalizing");

        let temp = part.temp_path().to_path_buf();
        let saved = part.finalize().map_err(|e| DownloadError::write(temp, e))?;
        tracing::info!(path = %saved.path.display(), bytes = saved.bytes, sha256 = %saved.sha256, "track saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrackId;

    fn addr(s: &str) -> AudioAddress {
        AudioAddress::parse(s).unwrap()
    }

    fn track(id: u64, title: &str, album_title: &str) -> Track {
        Track {
            id: TrackId(id),
            title: title.into(),
            album_title: album_title.into(),
            index: None,
        }
    }

    #[test]
    fn target_path_uses_url_extension() {
        let d = FileDownloader::new("/music", DownloadConfig::default());
        let p = d
            .target_path(&addr("https://cdn.example.com/a/b.MP3?x=1"), &track(1, "Song", "Album"))
            .unwrap();
        assert_eq!(p, PathBuf::from("/music/Album/Song.mp3"));
    }

    #[test]
    fn target_path_default_extension() {
        let d = FileDownloader::new("/music", DownloadConfig::default());
        let p = d
            .target_path(&addr("https://cdn.example.com/stream"), &track(1, "Song", "Album"))
            .unwrap();
        assert_eq!(p, PathBuf::from("/music/Album/Song.m4a"));
    }

    #[test]
    fn same_title_in_one_run_gets_track_id() {
        let d = FileDownloader::new("/music", DownloadConfig::default());
        let a = addr("https://cdn.example.com/x.m4a");
        let first = d.claim_path(&a, &track(11, "Intro", "Album")).unwrap();
        let second = d.claim_path(&a, &track(12, "Intro", "Album")).unwrap();
        // Different raw titles that sanitize to the same name collide too.
        let third = d.claim_path(&a, &track(13, "Intro ", "Album")).unwrap();
        assert_eq!(first, PathBuf::from("/music/Album/Intro.m4a"));
        assert_eq!(second, PathBuf::from("/music/Album/Intro_12.m4a"));
        assert_eq!(third, PathBuf::from("/music/Album/Intro_13.m4a"));

        // Same track listed twice still gets a free name.
        let again = d.claim_path(&a, &track(12, "Intro", "Album")).unwrap();
        assert_eq!(again, PathBuf::from("/music/Album/Intro_12_2.m4a"));
    }

    #[test]
    fn unwritable_root_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        // Output root is a regular file, so the album directory cannot be created.
        let d = FileDownloader::new(&blocker, DownloadConfig::default());
        let err = d
            .download(&addr("http://127.0.0.1:9/a.m4a"), &track(1, "t", "a"))
            .unwrap_err();
        assert!(matches!(err, DownloadError::Write { .. }), "{:?}", err);
    }
}
