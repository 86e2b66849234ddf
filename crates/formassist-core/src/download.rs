//! Download handshake for generated forms.
//!
//! A fill response is raw bytes plus headers. The handler negotiates a
//! filename (server suggestion first, then a name derived from the form id)
//! and hands the bytes to an [`ArtifactSink`], the port the infrastructure
//! layer implements for the actual save.

use std::future::Future;
use std::path::PathBuf;

use tracing::debug;

use formassist_types::download::{BinaryPayload, DownloadArtifact, ResponseHeaders, SavedDownload};
use formassist_types::error::DownloadError;

/// Extension appended to synthesized filenames.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Destination for downloaded artifacts.
///
/// Implementations must release any temporary resource they create on every
/// exit path, including failures.
pub trait ArtifactSink: Send + Sync {
    /// Save the artifact under its suggested filename and return its location.
    fn save(
        &self,
        artifact: &DownloadArtifact,
    ) -> impl Future<Output = Result<PathBuf, DownloadError>> + Send;
}

/// Resolves filenames and forwards downloads to a sink.
pub struct DownloadHandler<S> {
    sink: S,
}

impl<S: ArtifactSink> DownloadHandler<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Save a binary payload, returning the resolved filename and location.
    ///
    /// `fallback_name` is only called when the headers carry no usable
    /// filename. No retry: a sink failure is returned as-is.
    pub async fn save(
        &self,
        payload: BinaryPayload,
        fallback_name: impl FnOnce() -> String,
    ) -> Result<SavedDownload, DownloadError> {
        let filename = resolve_filename(&payload.headers, fallback_name)?;
        let artifact = DownloadArtifact {
            bytes: payload.bytes,
            suggested_filename: filename,
        };

        let path = self.sink.save(&artifact).await?;
        debug!(
            filename = %artifact.suggested_filename,
            bytes = artifact.bytes.len(),
            path = %path.display(),
            "download saved"
        );

        Ok(SavedDownload {
            filename: artifact.suggested_filename,
            path,
        })
    }
}

/// Pick the download filename: header suggestion, else `fallback_name()`.
pub fn resolve_filename(
    headers: &ResponseHeaders,
    fallback_name: impl FnOnce() -> String,
) -> Result<String, DownloadError> {
    if let Some(name) = headers
        .content_disposition()
        .and_then(parse_content_disposition)
    {
        return Ok(name);
    }

    let fallback = fallback_name();
    final_component(&fallback).ok_or(DownloadError::InvalidFilename(fallback))
}

/// Default name for a form: `filled-<id>.pdf` with every character outside
/// `[A-Za-z0-9]` replaced by `_`.
pub fn default_filename(form_id: &str) -> String {
    let sanitized: String = form_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("filled-{sanitized}.{DEFAULT_EXTENSION}")
}

/// Extract the filename from a `Content-Disposition` value.
///
/// `filename*` (RFC 5987) wins over `filename`. The result is reduced to its
/// last path component; empty, `.` and `..` yield `None`.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in split_params(value) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => extended = extended.or_else(|| decode_ext_value(raw.trim())),
            "filename" => plain = plain.or_else(|| Some(unquote(raw.trim()))),
            _ => {}
        }
    }

    extended
        .and_then(|name| final_component(&name))
        .or_else(|| plain.and_then(|name| final_component(&name)))
}

/// Split header parameters on `;`, ignoring separators inside quotes.
fn split_params(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

/// Strip surrounding quotes, and backslash escapes inside a quoted value.
///
/// Leading and trailing quotes are removed independently, so an unclosed
/// `"name.pdf` still yields `name.pdf`.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw.strip_prefix('"') else {
        return raw.strip_suffix('"').unwrap_or(raw).to_string();
    };
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode `charset'lang'percent-encoded`.
fn decode_ext_value(raw: &str) -> Option<String> {
    let mut parts = raw.splitn(3, '\'');
    let charset = parts.next()?.to_ascii_lowercase();
    let _language = parts.next()?;
    let encoded = parts.next()?;
    let bytes = percent_decode(encoded)?;

    match charset.as_str() {
        "utf-8" => String::from_utf8(bytes).ok(),
        "iso-8859-1" => Some(bytes.into_iter().map(char::from).collect()),
        _ => None,
    }
}

fn percent_decode(encoded: &str) -> Option<Vec<u8>> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Some(out)
}

fn final_component(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    match last {
        "" | "." | ".." => None,
        _ => Some(last.to_string()),
    }
}
