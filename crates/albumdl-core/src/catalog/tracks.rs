//! Paginated album track list.

use super::parse::{self, TrackPage, RET_NOT_FOUND, RET_OK};
use super::CatalogClient;
use crate::error::{FetchError, NetworkError};
use crate::model::{AlbumId, Track};
use crate::pipeline::TrackListFetcher;

/// Fetches every page of an album's track list from the catalog.
#[derive(Debug, Clone)]
pub struct CatalogTrackList {
    client: CatalogClient,
}

impl CatalogTrackList {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    fn fetch_page(&self, album_id: AlbumId, page: u32) -> Result<TrackPage, FetchError> {
        let url = self.client.track_list_url(album_id.get(), page);
        tracing::debug!(album_id = %album_id, page, "requesting track list page");
        let resp = self.client.get(&url)?;
        if resp.status == 404 {
            return Err(FetchError::NotFound(album_id));
        }
        if !resp.is_success() {
            return Err(NetworkError::Http(resp.status).into());
        }

        let env = parse::decode::<TrackPage>(&resp.body).map_err(FetchError::Decode)?;
        match env.ret {
            RET_OK => {}
            RET_NOT_FOUND => return Err(FetchError::NotFound(album_id)),
            code => {
                return Err(FetchError::Service {
                    code,
                    message: env.msg,
                })
            }
        }
        env.data
            .ok_or_else(|| FetchError::Decode("missing data".to_string()))
    }
}

/// Most pages to request for a reported total: one past the last full page,
/// clamped to the `pageNum` range. `total` is service-supplied.
fn page_cap(total: u64, page_size: u32) -> u32 {
    let pages = total
        .div_ceil(u64::from(page_size.max(1)))
        .saturating_add(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

impl TrackListFetcher for CatalogTrackList {
    fn fetch_tracks(&self, album_id: AlbumId) -> Result<Vec<Track>, FetchError> {
        let page_size = self.client.page_size();
        let mut tracks: Vec<Track> = Vec::new();
        let mut page = 1u32;
        let mut max_pages: Option<u32> = None;

        loop {
            let batch = self.fetch_page(album_id, page)?;
            let total = batch.track_total_count;
            // Page cap is fixed from the first response; later counts cannot extend it.
            let cap = *max_pages.get_or_insert_with(|| page_cap(total, page_size));

            let received = batch.tracks.len();
            for wire in batch.tracks {
                tracks.push(wire.into_track().map_err(FetchError::Decode)?);
            }

            if received == 0 || tracks.len() as u64 >= total {
                break;
            }
            if page >= cap {
                tracing::warn!(
                    album_id = %album_id,
                    got = tracks.len(),
                    total,
                    "track list page cap reached before total count"
                );
                break;
            }
            page = page
                .checked_add(1)
                .ok_or_else(|| FetchError::Decode(format!("track list exceeds {} pages", page)))?;
        }

        tracing::info!(album_id = %album_id, total = tracks.len(), pages = page, "track list fetched");
        Ok(tracks)
    }
}
