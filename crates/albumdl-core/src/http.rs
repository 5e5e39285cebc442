//! Blocking HTTP GET into memory for small JSON catalog responses.
//!
//! Uses the curl crate (libcurl). One easy handle per request, released on
//! return; nothing is pooled between calls.

use crate::error::NetworkError;
use std::collections::HashMap;
use std::time::Duration;

/// Catalog responses larger than this are treated as a transfer failure.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Status and body of a completed request. Non-2xx statuses are returned, not raised,
/// so callers can map them (e.g. 404 → not found).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Per-request options shared by all catalog calls.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HashMap<String, String>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

/// Build the curl header list from `Name: value` pairs.
pub(crate) fn header_list(headers: &HashMap<String, String>) -> Result<curl::easy::List, curl::Error> {
    let mut list = curl::easy::List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    Ok(list)
}

/// Performs a GET and buffers the body.
pub fn get(url: &str, opts: &RequestOptions) -> Result<HttpResponse, NetworkError> {
    let mut body: Vec<u8> = Vec::new();
    let mut overflow = false;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(5)?;
    easy.accept_encoding("")?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    if !opts.headers.is_empty() {
        easy.http_headers(header_list(&opts.headers)?)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if body.len() + data.len() > MAX_BODY_BYTES {
                overflow = true;
                return Ok(0); // abort transfer
            }
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        let res = transfer.perform();
        drop(transfer);
        if overflow {
            return Err(NetworkError::Transport {
                kind: crate::error::TransportKind::Other,
                message: format!("response exceeds {} bytes", MAX_BODY_BYTES),
            });
        }
        res?;
    }

    let status = easy.response_code()?;
    tracing::trace!(url, status, bytes = body.len(), "GET finished");
    Ok(HttpResponse { status, body })
}
