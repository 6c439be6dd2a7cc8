//! Request introspection.
//!
//! # Responsibilities
//! - Normalised local path for case-insensitive routing
//! - Verb classification with a GET fallback
//! - Query string and header lookup
//! - One-shot body read
//!
//! # Design Decisions
//! - A missing query key is `None`, a missing header is `""`; callers that
//!   want a plain string for headers get one without unwrapping
//! - Repeated keys and headers are joined with `,`

use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::error::Result;
use crate::exchange::{Exchange, ExchangeContext, HttpVerb};
use crate::http::headers::ACCEPT_ENCODING;

/// Local path of the request, percent-decoded and lower-cased.
pub fn request_path<C: ExchangeContext + ?Sized>(ctx: &C) -> String {
    percent_decode_str(ctx.uri().path())
        .decode_utf8_lossy()
        .to_lowercase()
}

/// Request verb; unknown methods read as `HttpVerb::Get`.
pub fn request_verb<C: ExchangeContext + ?Sized>(ctx: &C) -> HttpVerb {
    HttpVerb::from(ctx.method())
}

/// Whether `key` appears in the query string, with or without a value.
pub fn in_query_string<C: ExchangeContext + ?Sized>(ctx: &C, key: &str) -> bool {
    query_pairs(ctx).any(|(k, _)| k == key)
}

/// Value of `key` in the query string.
///
/// `None` when the key is absent; `Some("")` when it is present without a
/// value.
pub fn query_string<C: ExchangeContext + ?Sized>(ctx: &C, key: &str) -> Option<String> {
    let values: Vec<String> = query_pairs(ctx)
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

fn query_pairs<C: ExchangeContext + ?Sized>(ctx: &C) -> form_urlencoded::Parse<'_> {
    form_urlencoded::parse(ctx.uri().query().unwrap_or("").as_bytes())
}

pub fn has_request_header<C: ExchangeContext + ?Sized>(ctx: &C, name: &str) -> bool {
    ctx.headers().contains_key(name)
}

/// Value of the named request header, or an empty string when missing.
pub fn request_header<C: ExchangeContext + ?Sized>(ctx: &C, name: &str) -> String {
    let values: Vec<String> = ctx
        .headers()
        .get_all(name)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    values.join(",")
}

/// Whether the client lists `encoding` in `Accept-Encoding` with a non-zero
/// quality.
///
/// An entry naming the encoding takes precedence over `*`.
pub fn accepts_encoding<C: ExchangeContext + ?Sized>(ctx: &C, encoding: &str) -> bool {
    let header = request_header(ctx, ACCEPT_ENCODING);
    let mut wildcard = None;
    for item in header.split(',') {
        let mut parts = item.split(';');
        let token = parts.next().unwrap_or("").trim();
        let acceptable = parts
            .filter_map(|p| p.trim().strip_prefix("q="))
            .all(|q| q.trim().parse::<f32>().map(|q| q > 0.0).unwrap_or(true));
        if token.eq_ignore_ascii_case(encoding) {
            return acceptable;
        }
        if token == "*" {
            wildcard = Some(acceptable);
        }
    }
    wildcard.unwrap_or(false)
}

/// Read the request body as text.
///
/// `None` when the request declares no body. The body stream is consumed, so
/// later calls on the same exchange also return `None`.
pub async fn request_body(exchange: &mut Exchange, limit: usize) -> Result<Option<String>> {
    match exchange.take_body() {
        Some(body) => body.read_text(limit).await.map(Some),
        None => Ok(None),
    }
}

/// Method-call sugar for the introspection helpers.
pub trait ExchangeExt: ExchangeContext {
    fn request_path(&self) -> String {
        request_path(self)
    }

    fn request_verb(&self) -> HttpVerb {
        request_verb(self)
    }

    fn in_query_string(&self, key: &str) -> bool {
        in_query_string(self, key)
    }

    fn query_string(&self, key: &str) -> Option<String> {
        query_string(self, key)
    }

    fn has_request_header(&self, name: &str) -> bool {
        has_request_header(self, name)
    }

    fn request_header(&self, name: &str) -> String {
        request_header(self, name)
    }

    fn accepts_encoding(&self, encoding: &str) -> bool {
        accepts_encoding(self, encoding)
    }
}

impl<T: ExchangeContext + ?Sized> ExchangeExt for T {}
