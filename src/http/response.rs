use std::path::PathBuf;
use std::sync::Mutex;

use bytes::Bytes;

/// Body payload of a response.
///
/// Exactly one source is active: either the payload is held in memory, or it
/// refers to a file the host streams after the header block. The renderer
/// only consumes a file body's size, never its contents.
#[derive(Debug, Clone)]
pub enum Body {
    /// In-memory payload, appended verbatim after the blank line.
    InMemory(Bytes),
    /// External file to be streamed by the host.
    File(PathBuf),
}

/// A `Set-Cookie` entry, rendered as one header line per cookie.
#[derive(Debug, Clone, Default)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub(crate) fn header_line(&self) -> String {
        let mut line = format!("Set-Cookie: {}={}", self.name, self.value);
        if let Some(expires) = &self.expires {
            line.push_str("; Expires=");
            line.push_str(expires);
        }
        if let Some(domain) = &self.domain {
            line.push_str("; Domain=");
            line.push_str(domain);
        }
        if let Some(path) = &self.path {
            line.push_str("; Path=");
            line.push_str(path);
        }
        if self.secure {
            line.push_str("; Secure");
        }
        if self.http_only {
            line.push_str("; HttpOnly");
        }
        line.push_str("\r\n");
        line
    }
}

/// A previously rendered buffer plus its date bookkeeping.
///
/// Published buffers are immutable; the slot holding the current snapshot is
/// replaced wholesale under the response's lock, never mutated in place.
#[derive(Debug, Clone)]
pub(crate) struct RenderedSnapshot {
    pub(crate) bytes: Bytes,
    /// Byte position where the date value begins, `None` if never recorded.
    pub(crate) date_offset: Option<usize>,
    /// Epoch second the embedded date was formatted at.
    pub(crate) epoch_second: u64,
}

/// A complete HTTP response prior to serialization.
///
/// A response is constructed once (see [`ResponseBuilder`]) and may then be
/// rendered many times, concurrently, through a shared reference. Mutating
/// any render-relevant field discards the cached snapshot, so mutation
/// requires exclusive access.
///
/// The `expiry` policy controls buffer reuse: negative means every render
/// builds fresh bytes, non-negative marks the response as eligible for
/// snapshot reuse. The magnitude is kept for external eviction logic; the
/// renderer itself refreshes at a fixed one-second granularity.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    cookies: Vec<Cookie>,
    body: Body,
    close_connection: bool,
    expiry: i64,
    preassembled_headers: Option<Bytes>,
    pub(crate) snapshot: Mutex<Option<RenderedSnapshot>>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use herald::http::response::ResponseBuilder;
/// let response = ResponseBuilder::new(200)
///     .header("Content-Type", "text/plain")
///     .body("hello")
///     .expiry(0)
///     .build();
/// assert!(response.is_cacheable());
/// ```
pub struct ResponseBuilder {
    status: u16,
    headers: Vec<(String, String)>,
    cookies: Vec<Cookie>,
    body: Body,
    close_connection: bool,
    expiry: i64,
    preassembled_headers: Option<Bytes>,
}

impl ResponseBuilder {
    /// Creates a builder with the given status code. Responses start
    /// non-cacheable; call [`expiry`](Self::expiry) with a non-negative
    /// value to opt into snapshot reuse.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            cookies: Vec::new(),
            body: Body::InMemory(Bytes::new()),
            close_connection: false,
            expiry: -1,
            preassembled_headers: None,
        }
    }

    /// Adds or replaces a header. Last write wins; a replaced header keeps
    /// its original position so the rendered layout stays deterministic.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        upsert_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Appends a cookie, rendered as its own `Set-Cookie` line.
    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Sets an in-memory body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Body::InMemory(body.into());
        self
    }

    /// Sets a file-backed body. The renderer declares the file's current
    /// size as Content-Length; the host streams the file itself.
    pub fn send_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.body = Body::File(path.into());
        self
    }

    /// Sets the close-connection flag. When set and no explicit
    /// `Connection` header is declared, a `Connection: close` line is
    /// emitted.
    pub fn close_connection(mut self, close: bool) -> Self {
        self.close_connection = close;
        self
    }

    /// Sets the cache-expiry policy. Negative disables snapshot reuse.
    pub fn expiry(mut self, seconds: i64) -> Self {
        self.expiry = seconds;
        self
    }

    /// Supplies an already-assembled header block in place of header
    /// serialization: everything from the status line through the `Server`
    /// line, each line CRLF-terminated, including any `Set-Cookie` lines.
    /// The renderer still appends the `Date` header, blank line, and body,
    /// and the snapshot bookkeeping is unchanged.
    pub fn preassembled_headers(mut self, block: impl Into<Bytes>) -> Self {
        self.preassembled_headers = Some(block.into());
        self
    }

    /// Builds the final [`Response`].
    pub fn build(self) -> Response {
        Response {
            status: self.status,
            headers: self.headers,
            cookies: self.cookies,
            body: self.body,
            close_connection: self.close_connection,
            expiry: self.expiry,
            preassembled_headers: self.preassembled_headers,
            snapshot: Mutex::new(None),
        }
    }
}

impl Response {
    pub fn builder(status: u16) -> ResponseBuilder {
        ResponseBuilder::new(status)
    }

    /// Creates a simple 200 OK response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(200).body(body).build()
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        ResponseBuilder::new(404).body("404 Not Found").build()
    }

    /// Creates a 302 redirect to the given location.
    pub fn redirect(location: impl Into<String>) -> Self {
        ResponseBuilder::new(302)
            .header("Location", location)
            .build()
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Declared headers in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Retrieves a header value by name. Lookup is case-sensitive; names
    /// are stored as declared and conventionally normalized by the caller.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn close_connection(&self) -> bool {
        self.close_connection
    }

    pub fn expiry(&self) -> i64 {
        self.expiry
    }

    /// Whether rendered bytes may be retained for reuse.
    pub fn is_cacheable(&self) -> bool {
        self.expiry >= 0
    }

    pub fn preassembled_headers(&self) -> Option<&Bytes> {
        self.preassembled_headers.as_ref()
    }

    /// Adds or replaces a header and discards any cached snapshot.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        upsert_header(&mut self.headers, name.into(), value.into());
        self.invalidate();
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
        self.invalidate();
    }

    pub fn add_cookie(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
        self.invalidate();
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Body::InMemory(body.into());
        self.invalidate();
    }

    pub fn send_file(&mut self, path: impl Into<PathBuf>) {
        self.body = Body::File(path.into());
        self.invalidate();
    }

    pub fn set_close_connection(&mut self, close: bool) {
        self.close_connection = close;
        self.invalidate();
    }

    /// Changes the cache-expiry policy. A transition to a negative value
    /// makes the response non-cacheable and drops the snapshot immediately.
    pub fn set_expiry(&mut self, seconds: i64) {
        self.expiry = seconds;
        self.invalidate();
    }

    pub fn set_preassembled_headers(&mut self, block: impl Into<Bytes>) {
        self.preassembled_headers = Some(block.into());
        self.invalidate();
    }

    fn invalidate(&mut self) {
        let slot = self
            .snapshot
            .get_mut()
            .unwrap_or_else(|poison| poison.into_inner());
        *slot = None;
    }
}

fn upsert_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(k, _)| *k == name) {
        Some(slot) => slot.1 = value,
        None => headers.push((name, value)),
    }
}
