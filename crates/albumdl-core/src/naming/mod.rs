//! Output path derivation from album and track titles.
//!
//! Titles come from the catalog and are untrusted: every component is
//! sanitized, and the joined path is checked to stay under the output root.

mod path;
mod sanitize;

pub use path::extension_from_url;
pub use sanitize::{sanitize_component, NAME_MAX};

use crate::storage::TEMP_SUFFIX;
use std::path::{Component, Path, PathBuf};

/// Used when a title sanitizes to nothing.
pub const TITLE_FALLBACK: &str = "untitled";
/// Used when an album title sanitizes to nothing.
pub const ALBUM_FALLBACK: &str = "unknown-album";
/// Used when the extension sanitizes to nothing.
const EXT_FALLBACK: &str = "bin";

fn component_or(raw: &str, max_bytes: usize, fallback: &str) -> String {
    let s = sanitize_component(raw, max_bytes);
    if s.is_empty() {
        fallback.to_string()
    } else {
        s
    }
}

/// Computes `<root>/<album_title>/<title>.<ext>` with sanitized components.
///
/// The title is shortened so that `<title>.<ext>.part` still fits in NAME_MAX.
/// Returns `Err(candidate)` if the joined path would not be a direct
/// descendant of `root`.
pub fn track_path(root: &Path, album_title: &str, title: &str, ext: &str) -> Result<PathBuf, PathBuf> {
    track_path_tagged(root, album_title, title, None, ext)
}

/// Like [`track_path`], with `_<tag>` appended to the title. The tag survives
/// title truncation, so two tracks with the same title stay distinct.
pub fn track_path_tagged(
    root: &Path,
    album_title: &str,
    title: &str,
    tag: Option<&str>,
    ext: &str,
) -> Result<PathBuf, PathBuf> {
    let ext = component_or(ext, 16, EXT_FALLBACK);
    let album = component_or(album_title, NAME_MAX, ALBUM_FALLBACK);
    let tag = tag
        .map(|t| sanitize_component(t, 32))
        .filter(|t| !t.is_empty());
    let tag_len = tag.as_ref().map_or(0, |t| t.len() + 1);
    let title_budget = NAME_MAX - 1 - ext.len() - TEMP_SUFFIX.len() - tag_len;
    let stem = component_or(title, title_budget, TITLE_FALLBACK);
    let file_name = match tag {
        Some(tag) => format!("{}_{}.{}", stem, tag, ext),
        None => format!("{}.{}", stem, ext),
    };

    let candidate = root.join(&album).join(&file_name);
    if is_confined(root, &candidate) {
        Ok(candidate)
    } else {
        Err(candidate)
    }
}

/// True if `path` is `root` followed only by normal components.
pub fn is_confined(root: &Path, path: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(rest) => {
            let mut any = false;
            for c in rest.components() {
                if !matches!(c, Component::Normal(_)) {
                    return false;
                }
                any = true;
            }
            any
        }
        Err(_) => false,
    }
}
