//! Header names shared with other server components.
//!
//! Spelling lives here once so cooperating modules (static files, sessions,
//! compression) never repeat it. `HeaderMap` compares names
//! case-insensitively, so these can be passed straight to lookups.

use chrono::{DateTime, Utc};

pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const IF_MODIFIED_SINCE: &str = "If-Modified-Since";
pub const CACHE_CONTROL: &str = "Cache-Control";
pub const PRAGMA: &str = "Pragma";
pub const EXPIRES: &str = "Expires";
pub const LAST_MODIFIED: &str = "Last-Modified";
pub const IF_NONE_MATCH: &str = "If-None-Match";
pub const ETAG: &str = "ETag";
pub const ACCEPT_RANGES: &str = "Accept-Ranges";
pub const RANGE: &str = "Range";
pub const CONTENT_RANGE: &str = "Content-Range";

/// RFC 1123 date layout, always in GMT.
pub const BROWSER_TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub fn format_browser_time(time: DateTime<Utc>) -> String {
    time.format(BROWSER_TIME_FORMAT).to_string()
}
