//! Minimal HTTP/1.1 server standing in for the catalog and the audio host.
//!
//! Every connection is answered by a caller-supplied handler and then closed.
//! Requested targets are recorded so tests can count calls per endpoint.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Parsed request line.
#[derive(Debug, Clone)]
pub struct Request {
    pub path: String,
    pub query: HashMap<String, String>,
}

/// Response to send. `truncate_to` cuts the body short while still advertising
/// the full `Content-Length`, simulating a connection dropped mid-transfer.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub truncate_to: Option<usize>,
}

impl Reply {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.into().into_bytes(),
            truncate_to: None,
        }
    }

    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "audio/mp4",
            body,
            truncate_to: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: format!("status {}", status).into_bytes(),
            truncate_to: None,
        }
    }

    pub fn truncated(mut self, keep: usize) -> Self {
        self.truncate_to = Some(keep);
        self
    }
}

pub struct CatalogServer {
    pub base: String,
    log: Arc<Mutex<Vec<Request>>>,
}

impl CatalogServer {
    /// All requests seen so far, in arrival order.
    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }

    /// Number of requests whose path equals `path`.
    pub fn count(&self, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }
}

/// Starts a server in a background thread. The handler receives the parsed
/// request and the server's base URL (e.g. "http://127.0.0.1:12345").
/// The server runs until the process exits.
pub fn start<H>(handler: H) -> CatalogServer
where
    H: Fn(&Request, &str) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}", port);
    let log = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let thread_base = base.clone();
    let thread_log = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let handler = Arc::clone(&handler);
            let log = Arc::clone(&thread_log);
            let base = thread_base.clone();
            thread::spawn(move || handle(stream, handler.as_ref(), &log, &base));
        }
    });

    CatalogServer { base, log }
}

fn handle<H>(mut stream: std::net::TcpStream, handler: &H, log: &Mutex<Vec<Request>>, base: &str)
where
    H: Fn(&Request, &str) -> Reply,
{
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    let text = String::from_utf8_lossy(&raw);
    let target = match text.lines().next().and_then(|l| l.split_whitespace().nth(1)) {
        Some(t) => t.to_string(),
        None => return,
    };
    let parsed = match url::Url::parse(&format!("http://localhost{}", target)) {
        Ok(u) => u,
        Err(_) => return,
    };
    let request = Request {
        path: parsed.path().to_string(),
        query: parsed.query_pairs().into_owned().collect(),
    };
    log.lock().unwrap().push(request.clone());

    let reply = handler(&request, base);
    let reason = match reply.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason,
        reply.content_type,
        reply.body.len()
    );
    let body = match reply.truncate_to {
        Some(keep) => &reply.body[..keep.min(reply.body.len())],
        None => &reply.body[..],
    };
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
