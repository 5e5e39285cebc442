//! Album and track identifiers, track records, and resolved audio addresses.

use crate::error::ValidationError;
use std::fmt;
use url::Url;

/// Positive integer identifying an album in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlbumId(u64);

impl AlbumId {
    /// Parses a base-10 album id from user input.
    ///
    /// Surrounding whitespace and a single leading `+` are accepted; anything
    /// else that is not a positive integer fitting in `u64` is rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new(input, "empty"));
        }
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if let Some(rest) = digits.strip_prefix('-') {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ValidationError::new(input, "must be positive"));
            }
            return Err(ValidationError::new(input, "not an integer"));
        }
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::new(input, "not an integer"));
        }
        let value: u64 = digits
            .parse()
            .map_err(|_| ValidationError::new(input, "out of range"))?;
        Self::new(value).ok_or_else(|| ValidationError::new(input, "must be positive"))
    }

    /// Wraps an already-validated value; `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AlbumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identifier of a single track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of an album's track list, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub album_title: String,
    /// 1-based position reported by the catalog, if any.
    pub index: Option<u32>,
}

/// Time-bounded URL from which one track's audio can be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAddress(Url);

impl AudioAddress {
    /// Accepts only absolute `http`/`https` URLs.
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        match url.scheme() {
            "http" | "https" => Some(Self(url)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for AudioAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
