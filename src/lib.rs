//! Herald - HTTP response rendering
//!
//! Core library for serializing HTTP responses to wire bytes, with snapshot
//! reuse for responses that are rendered repeatedly.

pub mod config;
pub mod http;
