//! HTTP response rendering.
//!
//! This module turns a [`response::Response`] into the exact byte sequence
//! written to a socket, and caches rendered buffers for responses that are
//! sent over and over (shared error pages, redirects, cached bodies).
//!
//! # Architecture
//!
//! - **`status`**: numeric status code to reason phrase lookup
//! - **`date`**: HTTP date formatting at one-second resolution
//! - **`response`**: response representation, builder, and the snapshot slot
//! - **`render`**: header serialization and the cached render state machine
//! - **`writer`**: writes rendered bytes to an async stream
//!
//! # Render state machine
//!
//! Every render request takes one of four paths, decided per response:
//!
//! ```text
//!              ┌──────────────────────┐
//!              │  expiry < 0 ?        │── yes ──▶ full build, keep nothing
//!              └──────────┬───────────┘
//!                         │ cacheable
//!                         ▼
//!              ┌──────────────────────┐
//!              │  snapshot recorded?  │── no ───▶ full build, record snapshot
//!              └──────────┬───────────┘
//!                         │ yes
//!                         ▼
//!              ┌──────────────────────┐
//!              │  same epoch second?  │── yes ──▶ return cached bytes as-is
//!              └──────────┬───────────┘
//!                         │ stale
//!                         ▼
//!              copy buffer, overwrite the Date
//!              field in place, record the copy
//! ```
//!
//! Cached buffers are immutable once published: a stale snapshot is never
//! patched in place, only copied and then patched, so a caller holding a
//! returned buffer always sees consistent bytes.

pub mod date;
pub mod render;
pub mod response;
pub mod status;
pub mod writer;
