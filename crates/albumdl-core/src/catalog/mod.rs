//! Catalog service client: album track listing and audio address resolution.
//!
//! Both endpoints share one `CatalogClient`, built from an explicit
//! `CatalogConfig`; nothing here is global.

mod audio;
mod parse;
mod tracks;

pub use audio::CatalogAudioResolver;
pub use tracks::CatalogTrackList;

use crate::config::CatalogConfig;
use crate::error::NetworkError;
use crate::http::{self, HttpResponse, RequestOptions};
use url::Url;

/// Path of the paginated track list endpoint.
const TRACK_LIST_PATH: &str = "/revision/album/v1/getTracksList";
/// Path of the audio address endpoint.
const AUDIO_PATH: &str = "/revision/play/v1/audio";

/// Shared request plumbing for catalog endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base: Url,
    page_size: u32,
    opts: RequestOptions,
}

impl CatalogClient {
    pub fn new(cfg: &CatalogConfig) -> anyhow::Result<Self> {
        let base = Url::parse(cfg.base_url.trim_end_matches('/'))
            .map_err(|e| anyhow::anyhow!("invalid catalog base_url {:?}: {}", cfg.base_url, e))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("catalog base_url must be http or https: {}", cfg.base_url);
        }

        let mut headers = cfg.headers.clone();
        headers
            .entry("User-Agent".to_string())
            .or_insert_with(|| cfg.user_agent.clone());
        headers
            .entry("Accept".to_string())
            .or_insert_with(|| "application/json".to_string());
        if let Some(cookie) = cfg.cookie.as_deref().filter(|c| !c.is_empty()) {
            headers.insert("Cookie".to_string(), cookie.to_string());
        }

        Ok(Self {
            base,
            page_size: cfg.page_size.max(1),
            opts: RequestOptions {
                headers,
                connect_timeout: cfg.connect_timeout(),
                timeout: cfg.request_timeout(),
            },
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url.query_pairs_mut()
            .clear()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        url
    }

    pub(crate) fn track_list_url(&self, album_id: u64, page: u32) -> Url {
        self.endpoint(
            TRACK_LIST_PATH,
            &[
                ("albumId", album_id.to_string()),
                ("pageNum", page.to_string()),
                ("pageSize", self.page_size.to_string()),
            ],
        )
    }

    pub(crate) fn audio_url(&self, track_id: u64) -> Url {
        self.endpoint(
            AUDIO_PATH,
            &[("id", track_id.to_string()), ("ptype", "1".to_string())],
        )
    }

    pub(crate) fn get(&self, url: &Url) -> Result<HttpResponse, NetworkError> {
        http::get(url.as_str(), &self.opts)
    }
}
