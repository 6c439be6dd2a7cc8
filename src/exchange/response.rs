//! Response composition.
//!
//! # Responsibilities
//! - Cache-busting headers
//! - 302 redirects, optionally absolute
//! - JSON output (typed values and pre-rendered text)
//! - Fixed 404/500 pages
//!
//! # Design Decisions
//! - JSON indentation is a runtime flag on `ResponseComposer`; its default
//!   tracks the build profile
//! - Output writes propagate I/O errors untouched

use std::io::Write;

use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;

use crate::config::ExchangeConfig;
use crate::content::json::to_json_text;
use crate::diagnostics::exception_message;
use crate::error::Result;
use crate::exchange::{request_url, Exchange};
use crate::http::headers::{format_browser_time, CACHE_CONTROL, EXPIRES, LAST_MODIFIED, PRAGMA};
use crate::http::pages::{render_500, RESPONSE_404};

/// `Expires` value used to mark a response as long stale.
pub const EXPIRED_TIMESTAMP: &str = "Mon, 26 Jul 1997 05:00:00 GMT";

pub const NO_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate";

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const CONTENT_TYPE: &str = "Content-Type";
const LOCATION: &str = "Location";

/// Write the four cache-busting headers, replacing earlier values.
pub fn no_cache(exchange: &mut Exchange) -> Result<()> {
    let now = format_browser_time(Utc::now());
    let response = exchange.response_mut();
    response.set_header(EXPIRES, EXPIRED_TIMESTAMP)?;
    response.set_header(LAST_MODIFIED, &now)?;
    response.set_header(CACHE_CONTROL, NO_CACHE_CONTROL)?;
    response.set_header(PRAGMA, "no-cache")?;
    Ok(())
}

/// Answer with `302 Found`.
///
/// With `use_absolute_url` the location is prefixed with the scheme and
/// authority of the request URL. The target itself is not validated.
pub fn redirect(exchange: &mut Exchange, location: &str, use_absolute_url: bool) -> Result<()> {
    let location = if use_absolute_url {
        match request_url(&*exchange) {
            Some(url) => format!("{}{}", url.origin().ascii_serialization(), location),
            None => location.to_string(),
        }
    } else {
        location.to_string()
    };

    let response = exchange.response_mut();
    response.set_status(StatusCode::FOUND);
    response.set_header(LOCATION, &location)
}

/// Write pre-rendered JSON text as the response body.
pub fn json_text_response(exchange: &mut Exchange, json: &str) -> Result<()> {
    let response = exchange.response_mut();
    response.set_header(CONTENT_TYPE, JSON_CONTENT_TYPE)?;
    response.output_mut().write_all(json.as_bytes())?;
    Ok(())
}

/// Write the fixed 404 page.
pub fn write_not_found(exchange: &mut Exchange) -> Result<()> {
    let response = exchange.response_mut();
    response.set_status(StatusCode::NOT_FOUND);
    response.set_header(CONTENT_TYPE, HTML_CONTENT_TYPE)?;
    response.output_mut().write_all(RESPONSE_404.as_bytes())?;
    Ok(())
}

/// Write the 500 page for `err`, discarding anything already buffered.
pub fn write_server_error(exchange: &mut Exchange, err: &(dyn std::error::Error + 'static)) -> Result<()> {
    let page = render_500(&exception_message(err), &format!("{:?}", err));
    let response = exchange.response_mut();
    response.replace_output(Vec::new());
    response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.set_header(CONTENT_TYPE, HTML_CONTENT_TYPE)?;
    response.output_mut().write_all(page.as_bytes())?;
    Ok(())
}

/// Serialises values into responses.
#[derive(Debug, Clone, Copy)]
pub struct ResponseComposer {
    pretty_json: bool,
}

impl Default for ResponseComposer {
    fn default() -> Self {
        Self {
            pretty_json: cfg!(debug_assertions),
        }
    }
}

impl ResponseComposer {
    pub fn new(pretty_json: bool) -> Self {
        Self { pretty_json }
    }

    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(config.pretty_json)
    }

    pub fn pretty_json(&self) -> bool {
        self.pretty_json
    }

    /// Serialise `data` and write it as the JSON response body.
    pub fn json_response<T: Serialize + ?Sized>(&self, exchange: &mut Exchange, data: &T) -> Result<()> {
        let json = to_json_text(data, self.pretty_json)?;
        json_text_response(exchange, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;

    fn exchange(uri: &str) -> Exchange {
        Exchange::from_request(Request::builder().uri(uri).body(Body::empty()).unwrap(), "http")
    }

    #[test]
    fn test_no_cache_sets_exactly_four_headers() {
        let mut ex = exchange("/");
        no_cache(&mut ex).unwrap();

        let headers = ex.response().headers();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers["expires"], EXPIRED_TIMESTAMP);
        assert_eq!(headers["cache-control"], "no-store, no-cache, must-revalidate");
        assert_eq!(headers["pragma"], "no-cache");

        let last_modified = headers["last-modified"].to_str().unwrap();
        assert!(last_modified.ends_with(" GMT"));
        assert!(chrono::NaiveDateTime::parse_from_str(last_modified, "%a, %d %b %Y %H:%M:%S GMT").is_ok());
        assert_eq!(ex.response().status(), StatusCode::OK);
    }

    #[test]
    fn test_no_cache_replaces_existing_values() {
        let mut ex = exchange("/");
        ex.response_mut().set_header(CACHE_CONTROL, "public").unwrap();
        no_cache(&mut ex).unwrap();
        let values: Vec<_> = ex.response().headers().get_all(CACHE_CONTROL).iter().collect();
        assert_eq!(values, vec![NO_CACHE_CONTROL]);
    }

    #[test]
    fn test_relative_redirect() {
        let mut ex = exchange("https://host:1234/orig");
        redirect(&mut ex, "/x", false).unwrap();
        assert_eq!(ex.response().status(), StatusCode::FOUND);
        assert_eq!(ex.response().headers()["location"], "/x");
    }

    #[test]
    fn test_absolute_redirect() {
        let mut ex = exchange("https://host:1234/orig");
        redirect(&mut ex, "/x", true).unwrap();
        assert_eq!(ex.response().status(), StatusCode::FOUND);
        assert_eq!(ex.response().headers()["location"], "https://host:1234/x");
    }

    #[test]
    fn test_absolute_redirect_uses_host_header() {
        let mut ex = Exchange::from_request(
            Request::builder()
                .uri("/orig")
                .header("Host", "example.org")
                .body(Body::empty())
                .unwrap(),
            "https",
        );
        redirect(&mut ex, "/login", true).unwrap();
        assert_eq!(ex.response().headers()["location"], "https://example.org/login");
    }

    #[test]
    fn test_absolute_redirect_without_usable_host_is_verbatim() {
        let mut missing = exchange("/orig");
        redirect(&mut missing, "/x", true).unwrap();
        assert_eq!(missing.response().headers()["location"], "/x");

        let mut bad = Exchange::from_request(
            Request::builder()
                .uri("/orig")
                .header("Host", "bad host")
                .body(Body::empty())
                .unwrap(),
            "http",
        );
        redirect(&mut bad, "/x", true).unwrap();
        assert_eq!(bad.response().status(), StatusCode::FOUND);
        assert_eq!(bad.response().headers()["location"], "/x");
    }

    #[test]
    fn test_json_text_response() {
        let mut ex = exchange("/");
        json_text_response(&mut ex, "{\"ok\":true}").unwrap();
        assert_eq!(ex.response().headers()["content-type"], "application/json");
        assert_eq!(ex.response().output(), b"{\"ok\":true}");
    }

    #[test]
    fn test_json_response_formatting_flag() {
        let data = json!({"name": "ö", "n": 1});

        let mut compact = exchange("/");
        ResponseComposer::new(false).json_response(&mut compact, &data).unwrap();
        assert_eq!(
            std::str::from_utf8(compact.response().output()).unwrap(),
            "{\"n\":1,\"name\":\"ö\"}"
        );

        let mut pretty = exchange("/");
        ResponseComposer::new(true).json_response(&mut pretty, &data).unwrap();
        let text = std::str::from_utf8(pretty.response().output()).unwrap();
        assert!(text.contains("\n  \"n\": 1"));
    }

    #[test]
    fn test_composer_default_tracks_build_profile() {
        assert_eq!(ResponseComposer::default().pretty_json(), cfg!(debug_assertions));
    }

    #[test]
    fn test_not_found_page() {
        let mut ex = exchange("/missing");
        write_not_found(&mut ex).unwrap();
        assert_eq!(ex.response().status(), StatusCode::NOT_FOUND);
        assert_eq!(ex.response().output(), RESPONSE_404.as_bytes());
    }

    #[test]
    fn test_server_error_page_replaces_output() {
        let mut ex = exchange("/");
        json_text_response(&mut ex, "{}").unwrap();

        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        write_server_error(&mut ex, &err).unwrap();

        let body = std::str::from_utf8(ex.response().output()).unwrap();
        assert_eq!(ex.response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("<html><head></head><body><h1>500 - Internal Server Error</h1>"));
        assert!(body.contains("<pre>disk on fire</pre>"));
        assert_eq!(ex.response().headers()["content-type"], HTML_CONTENT_TYPE);
    }
}
