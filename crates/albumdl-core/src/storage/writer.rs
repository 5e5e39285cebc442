//! Sequential writer for a track's temp file.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;
use crate::pipeline::SavedTrack;

/// Open `.part` file for one download. Hashes what it writes.
///
/// Dropping it without calling [`PartFile::finalize`] closes the handle and
/// deletes the temp file.
pub struct PartFile {
    file: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
    hasher: Sha256,
    written: u64,
}

impl PartFile {
    /// Create (or truncate) `<final_path>.part`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        Ok(Self {
            file: Some(BufWriter::new(file)),
            temp_path,
            final_path: final_path.to_path_buf(),
            hasher: Sha256::new(),
            written: 0,
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Append a chunk of the response body.
    pub fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "part file already closed"))?;
        file.write_all(data)?;
        self.hasher.update(data);
        self.written += data.len() as u64;
        Ok(())
    }

    /// Flush, sync, close, and rename over the final path (replacing any previous file).
    pub fn finalize(mut self) -> io::Result<SavedTrack> {
        let file = self
            .file
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "part file already closed"))?;
        let file = file.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&self.temp_path, &self.final_path)?;
        let sha256 = hex::encode(std::mem::take(&mut self.hasher).finalize());
        let saved = SavedTrack {
            path: std::mem::take(&mut self.final_path),
            bytes: self.written,
            sha256,
        };
        // Renamed: nothing left for Drop to clean up.
        self.temp_path = PathBuf::new();
        Ok(saved)
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        drop(self.file.take());
        if self.temp_path.as_os_str().is_empty() {
            return;
        }
        match std::fs::remove_file(&self.temp_path) {
            Ok(()) => {
                tracing::debug!(path = %self.temp_path.display(), "removed incomplete part file")
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.temp_path.display(),
                "could not remove incomplete part file: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_renames_and_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("song.m4a");
        let mut part = PartFile::create(&final_path).unwrap();
        let tp = part.temp_path().to_path_buf();
        assert!(tp.exists());
        part.write_chunk(b"hel").unwrap();
        part.write_chunk(b"lo\n").unwrap();
        assert_eq!(part.written(), 6);
        let saved = part.finalize().unwrap();

        assert!(!tp.exists());
        assert_eq!(saved.path, final_path);
        assert_eq!(saved.bytes, 6);
        assert_eq!(
            saved.sha256,
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello\n");
    }

    #[test]
    fn drop_without_finalize_removes_part() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("song.m4a");
        {
            let mut part = PartFile::create(&final_path).unwrap();
            part.write_chunk(b"partial").unwrap();
        }
        assert!(!final_path.exists());
        assert!(!temp_path(&final_path).exists());
    }

    #[test]
    fn finalize_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("song.m4a");
        std::fs::write(&final_path, b"old content that is longer").unwrap();
        let mut part = PartFile::create(&final_path).unwrap();
        part.write_chunk(b"new").unwrap();
        part.finalize().unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"new");
    }

    #[test]
    fn failed_download_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("song.m4a");
        std::fs::write(&final_path, b"complete").unwrap();
        drop(PartFile::create(&final_path).unwrap());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"complete");
    }
}
