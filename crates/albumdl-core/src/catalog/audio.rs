//! Audio address resolution for a single track.

use super::parse::{self, AudioInfo, RET_NOT_FOUND, RET_OK};
use super::CatalogClient;
use crate::error::{NetworkError, ResolutionError};
use crate::model::{AudioAddress, TrackId};
use crate::pipeline::AudioAddressResolver;

#[derive(Debug, Clone)]
pub struct CatalogAudioResolver {
    client: CatalogClient,
}

impl CatalogAudioResolver {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }
}

impl AudioAddressResolver for CatalogAudioResolver {
    fn resolve(&self, track_id: TrackId) -> Result<AudioAddress, ResolutionError> {
        let url = self.client.audio_url(track_id.0);
        let resp = self.client.get(&url)?;
        if resp.status == 404 {
            return Err(ResolutionError::UnknownTrack(track_id));
        }
        if !resp.is_success() {
            return Err(NetworkError::Http(resp.status).into());
        }

        let env = parse::decode::<AudioInfo>(&resp.body).map_err(ResolutionError::Decode)?;
        match env.ret {
            RET_OK => {}
            RET_NOT_FOUND => return Err(ResolutionError::UnknownTrack(track_id)),
            code => {
                return Err(ResolutionError::Service {
                    code,
                    message: env.msg,
                })
            }
        }
        let info = env
            .data
            .ok_or_else(|| ResolutionError::Decode("missing data".to_string()))?;

        let src = match info.src.as_deref().map(str::trim) {
            Some(s) if info.can_play && !s.is_empty() => s,
            _ => return Err(ResolutionError::Unavailable(track_id)),
        };
        let address = AudioAddress::parse(src)
            .ok_or_else(|| ResolutionError::Decode(format!("not an http(s) url: {:?}", src)))?;

        tracing::debug!(track_id = %track_id, host = address.url().host_str().unwrap_or(""), "audio address resolved");
        Ok(address)
    }
}
