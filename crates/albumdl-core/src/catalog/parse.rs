//! Catalog JSON envelopes and their conversion into model types.

use serde::Deserialize;

use crate::model::{Track, TrackId};

/// `ret` value the catalog uses for success.
pub(crate) const RET_OK: i64 = 200;
/// `ret` value the catalog uses for an unknown album or track.
pub(crate) const RET_NOT_FOUND: i64 = 404;

/// Common response wrapper: `{"ret": 200, "msg": "...", "data": {...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub ret: i64,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackPage {
    #[serde(default)]
    pub track_total_count: u64,
    #[serde(default)]
    pub tracks: Vec<WireTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTrack {
    pub track_id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub album_title: String,
    pub index: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AudioInfo {
    #[serde(default = "default_can_play")]
    pub can_play: bool,
    #[serde(default)]
    pub src: Option<String>,
}

fn default_can_play() -> bool {
    true
}

pub(crate) fn decode<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<Envelope<T>, String> {
    serde_json::from_slice(body).map_err(|e| e.to_string())
}

impl WireTrack {
    pub(crate) fn into_track(self) -> Result<Track, String> {
        if self.track_id == 0 {
            return Err("track with trackId 0".to_string());
        }
        Ok(Track {
            id: TrackId(self.track_id),
            title: self.title,
            album_title: self.album_title,
            index: self.index,
        })
    }
}
