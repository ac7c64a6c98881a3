use std::fs;
use std::path::PathBuf;
use std::sync::MutexGuard;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tracing::{error, trace};

use crate::config::ServerIdent;
use crate::http::date::{HTTP_DATE_LEN, http_date, now_epoch_seconds};
use crate::http::response::{Body, RenderedSnapshot, Response};
use crate::http::status::reason_phrase;

/// A render that cannot produce correct wire bytes.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Content-Length for a file-backed body could not be determined. Fatal
    /// for this render; never defaulted to zero.
    #[error("cannot determine size of {path}: {source}")]
    FileMetadataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders responses to wire bytes, reusing cached buffers where the
/// response's expiry policy allows it.
///
/// One renderer is shared across all request handlers; the per-response
/// snapshot slot is the only mutable state touched during a render, guarded
/// by that response's own lock.
pub struct Renderer {
    server: ServerIdent,
    header_builds: AtomicUsize,
}

impl Renderer {
    pub fn new(server: ServerIdent) -> Self {
        Self {
            server,
            header_builds: AtomicUsize::new(0),
        }
    }

    /// Renders a response to the exact byte sequence to write to a socket:
    /// status line, headers each CRLF-terminated, one blank line, then raw
    /// body bytes. For file-backed bodies the returned buffer ends at the
    /// blank line and the host streams the file contents.
    pub fn render(&self, response: &Response) -> Result<Bytes, RenderError> {
        self.render_at(response, now_epoch_seconds())
    }

    /// Renders as of the given wall-clock second. [`render`](Self::render)
    /// delegates here with the current time; taking the instant as an
    /// argument keeps the cache's staleness handling deterministic under
    /// test.
    pub fn render_at(&self, response: &Response, now: u64) -> Result<Bytes, RenderError> {
        if response.is_cacheable() {
            let mut slot = lock_snapshot(response);
            if let Some(snapshot) = slot.as_ref() {
                debug_assert!(
                    snapshot.date_offset.is_some(),
                    "snapshot recorded without a date offset"
                );
                if let Some(offset) = snapshot.date_offset {
                    if snapshot.epoch_second >= now {
                        // Fresh, or a racing render already stamped a later
                        // second; either way the stored bytes stand.
                        return Ok(snapshot.bytes.clone());
                    }
                    let patched = patch_date(&snapshot.bytes, offset, now);
                    *slot = Some(RenderedSnapshot {
                        bytes: patched.clone(),
                        date_offset: Some(offset),
                        epoch_second: now,
                    });
                    return Ok(patched);
                }
            }
        }

        // Full build runs unlocked: resolving a file body's size may block.
        let (bytes, date_offset) = self.build(response, now)?;

        if response.is_cacheable() {
            let mut slot = lock_snapshot(response);
            let superseded = slot.as_ref().is_some_and(|s| s.epoch_second > now);
            if !superseded {
                *slot = Some(RenderedSnapshot {
                    bytes: bytes.clone(),
                    date_offset: Some(date_offset),
                    epoch_second: now,
                });
            }
        }
        Ok(bytes)
    }

    /// Number of full header serializations performed. Cache hits and
    /// date patches leave this untouched.
    pub fn header_builds(&self) -> usize {
        self.header_builds.load(Ordering::Relaxed)
    }

    fn build(&self, response: &Response, now: u64) -> Result<(Bytes, usize), RenderError> {
        let mut buf = match response.preassembled_headers() {
            Some(block) => {
                let mut buf = Vec::with_capacity(block.len() + HTTP_DATE_LEN + 16);
                buf.extend_from_slice(block);
                buf
            }
            None => self.serialize_headers(response)?,
        };

        buf.extend_from_slice(b"Date: ");
        let date_offset = buf.len();
        buf.extend_from_slice(http_date(now).as_bytes());
        buf.extend_from_slice(b"\r\n\r\n");
        trace!(status = response.status(), head_len = buf.len(), "rendered response head");

        if let Body::InMemory(body) = response.body() {
            buf.extend_from_slice(body);
        }
        Ok((Bytes::from(buf), date_offset))
    }

    /// Assembles everything before the `Date` header: status line,
    /// Content-Length, optional `Connection: close`, declared headers in
    /// insertion order, cookies, and the `Server` line. The `Date` header is
    /// appended by the caller so its byte offset is known precisely.
    fn serialize_headers(&self, response: &Response) -> Result<Vec<u8>, RenderError> {
        self.header_builds.fetch_add(1, Ordering::Relaxed);

        let length = declared_content_length(response.body())?;

        let mut buf = Vec::with_capacity(256);
        let status = response.status();
        buf.extend_from_slice(
            format!("HTTP/1.1 {} {}\r\n", status, reason_phrase(status)).as_bytes(),
        );
        buf.extend_from_slice(format!("Content-Length: {length}\r\n").as_bytes());

        if response.close_connection() && response.header("Connection").is_none() {
            buf.extend_from_slice(b"Connection: close\r\n");
        }

        for (name, value) in response.headers() {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        for cookie in response.cookies() {
            buf.extend_from_slice(cookie.header_line().as_bytes());
        }

        buf.extend_from_slice(self.server.header_line().as_bytes());
        Ok(buf)
    }
}

/// Byte length to declare in the Content-Length header.
fn declared_content_length(body: &Body) -> Result<u64, RenderError> {
    match body {
        Body::InMemory(bytes) => Ok(bytes.len() as u64),
        Body::File(path) => match fs::metadata(path) {
            Ok(meta) => Ok(meta.len()),
            Err(source) => {
                error!(path = %path.display(), %source, "stat failed, aborting render");
                Err(RenderError::FileMetadataUnavailable {
                    path: path.clone(),
                    source,
                })
            }
        },
    }
}

/// Copies a published buffer and overwrites exactly the date field's span.
/// The date format is fixed-width, so the copy's length never changes.
fn patch_date(stale: &Bytes, offset: usize, now: u64) -> Bytes {
    let stamp = http_date(now);
    debug_assert_eq!(stamp.len(), HTTP_DATE_LEN);
    let mut buf = BytesMut::with_capacity(stale.len());
    buf.extend_from_slice(stale);
    buf[offset..offset + HTTP_DATE_LEN].copy_from_slice(stamp.as_bytes());
    buf.freeze()
}

fn lock_snapshot(response: &Response) -> MutexGuard<'_, Option<RenderedSnapshot>> {
    // The slot only ever holds fully-formed snapshots, so a poisoned lock
    // still guards consistent data.
    response
        .snapshot
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}
