//! Single-stream HTTP GET into a part file.

use crate::config::DownloadConfig;
use crate::error::{DownloadError, NetworkError};
use crate::http::header_list;
use crate::storage::PartFile;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

/// Streams `url` into `part`. Returns the number of bytes written.
///
/// On any error the caller drops `part`, which removes the temp file.
pub fn stream_to(
    url: &str,
    custom_headers: &HashMap<String, String>,
    cfg: &DownloadConfig,
    part: &mut PartFile,
) -> Result<u64, DownloadError> {
    let mut write_err: Option<io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(NetworkError::from)?;
    easy.follow_location(true).map_err(NetworkError::from)?;
    easy.max_redirections(10).map_err(NetworkError::from)?;
    easy.fail_on_error(true).map_err(NetworkError::from)?;
    easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .map_err(NetworkError::from)?;
    easy.low_speed_limit(cfg.low_speed_limit_bytes)
        .map_err(NetworkError::from)?;
    easy.low_speed_time(Duration::from_secs(cfg.low_speed_time_secs))
        .map_err(NetworkError::from)?;
    easy.timeout(Duration::from_secs(cfg.timeout_secs))
        .map_err(NetworkError::from)?;
    if !custom_headers.is_empty() {
        let list = header_list(custom_headers).map_err(NetworkError::from)?;
        easy.http_headers(list).map_err(NetworkError::from)?;
    }

    let res = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match part.write_chunk(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })
            .map_err(NetworkError::from)?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(DownloadError::write(part.temp_path(), e));
    }
    if let Err(e) = res {
        if e.is_http_returned_error() {
            let code = easy.response_code().unwrap_or(0);
            return Err(NetworkError::Http(code).into());
        }
        return Err(NetworkError::from(e).into());
    }

    let code = easy.response_code().map_err(NetworkError::from)?;
    if !(200..300).contains(&code) {
        return Err(NetworkError::Http(code).into());
    }
    Ok(part.written())
}
