//! Binary response and download artifact types.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Response headers keyed by lowercased name.
///
/// Only the first value of a repeated header is kept; the download handshake
/// never needs more.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: BTreeMap<String, String>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header. Names are case-insensitive; the first value wins.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.get("content-disposition")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A successful binary response: body bytes plus their headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryPayload {
    pub bytes: Vec<u8>,
    pub headers: ResponseHeaders,
}

/// Bytes ready to be written under a negotiated filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub bytes: Vec<u8>,
    pub suggested_filename: String,
}

/// Where a saved artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDownload {
    pub filename: String,
    pub path: PathBuf,
}
