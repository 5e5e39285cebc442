//! Disk I/O and file lifecycle for one track.
//!
//! Audio is written sequentially to `<final>.part`; `finalize` flushes, syncs
//! and renames it over the final name. A `PartFile` that is dropped without
//! being finalized removes its temp file, so an interrupted transfer never
//! leaves something that looks complete.

mod writer;

pub use writer::PartFile;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.m4a` → `a.m4a.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
