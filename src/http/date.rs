use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// On-wire width of an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
///
/// The format is fixed-width, which is what makes patching the date bytes of
/// a cached buffer in place possible without shifting anything.
pub const HTTP_DATE_LEN: usize = 29;

/// Formats a whole epoch second as an RFC 7231 IMF-fixdate string.
///
/// Resolution is exactly one second: two calls with the same epoch second
/// produce byte-identical strings. This is the basis of the snapshot
/// staleness test in the renderer.
pub fn http_date(epoch_seconds: u64) -> String {
    httpdate::fmt_http_date(UNIX_EPOCH + Duration::from_secs(epoch_seconds))
}

/// Current wall-clock time truncated to whole seconds since the Unix epoch.
pub fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_instants() {
        assert_eq!(http_date(0), "Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(http_date(784111777), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn always_fixed_width() {
        for secs in [0, 1, 784111777, 1_000_000_000, 4_102_444_800] {
            assert_eq!(http_date(secs).len(), HTTP_DATE_LEN, "secs={secs}");
        }
    }

    #[test]
    fn identical_within_a_second() {
        assert_eq!(http_date(1000), http_date(1000));
        assert_ne!(http_date(1000), http_date(1001));
    }
}
