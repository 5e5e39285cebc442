//! Classify curl errors into transport kinds for reporting.

use std::fmt;

/// Coarse category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connection,
    /// Body ended before the advertised length, or the peer reset mid-stream.
    Interrupted,
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportKind::Timeout => "timed out",
            TransportKind::Connection => "connection failed",
            TransportKind::Interrupted => "stream interrupted",
            TransportKind::Other => "transfer failed",
        };
        f.write_str(s)
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> TransportKind {
    if e.is_operation_timedout() {
        return TransportKind::Timeout;
    }
    if e.is_partial_file() || e.is_recv_error() || e.is_read_error() || e.is_got_nothing() {
        return TransportKind::Interrupted;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_send_error()
    {
        return TransportKind::Connection;
    }
    TransportKind::Other
}
