//! File extension from the audio URL path.

use url::Url;

const MAX_EXT_LEN: usize = 5;

/// Extension of the last path segment of `url`, lowercased.
///
/// Returns `None` when there is no dot, or the extension is not 1..=5 ASCII
/// alphanumerics (query strings and fragments are ignored).
pub fn extension_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXT_LEN {
        return None;
    }
    if !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
