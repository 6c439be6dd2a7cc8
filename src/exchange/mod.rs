//! Exchange handle and the request/response helpers that operate on it.
//!
//! # Data Flow
//! ```text
//! axum Request<Body>
//!     → Exchange::from_request (split head, body, scheme)
//!     → request.rs (path, verb, query, headers, body)
//!     → handler logic (external)
//!     → response.rs (no-cache, redirect, JSON output)
//!     → Exchange::into_response → axum Response
//! ```
//!
//! # Design Decisions
//! - Helpers are free functions over a borrowed exchange, mirrored as methods
//!   through `ExchangeExt`; nothing keeps a reference past the call
//! - The request body can be taken exactly once (ownership transfer)
//! - Response output is buffered and handed to axum in one piece

pub mod body;
pub mod request;
pub mod response;
pub mod verb;
pub mod websocket;

use axum::{
    body::Body,
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode, Uri},
    response::Response,
};
use url::Url;

use crate::error::{ExchangeError, Result};

pub use body::{Charset, RequestBody};
pub use request::ExchangeExt;
pub use response::ResponseComposer;
pub use verb::HttpVerb;
pub use websocket::WebSocketContext;

/// Read-only view of a request head.
///
/// Implemented by plain HTTP exchanges and by upgraded websocket contexts so
/// session lookups and URL reconstruction work on either.
pub trait ExchangeContext {
    fn method(&self) -> &Method;
    fn uri(&self) -> &Uri;
    fn headers(&self) -> &HeaderMap;
    /// Scheme the request arrived on (`http` or `https`).
    fn scheme(&self) -> &str;
}

/// One in-flight HTTP exchange.
#[derive(Debug)]
pub struct Exchange {
    head: Parts,
    scheme: String,
    body: Option<RequestBody>,
    response: ResponseDraft,
}

impl Exchange {
    /// Split an incoming request into an exchange.
    ///
    /// The body is kept only when the head declares one.
    pub fn from_request(request: Request<Body>, scheme: impl Into<String>) -> Self {
        let (head, body) = request.into_parts();
        let body = if declares_entity_body(&head.headers) {
            Some(RequestBody::new(body, Charset::from_headers(&head.headers)))
        } else {
            None
        };

        Self {
            head,
            scheme: scheme.into(),
            body,
            response: ResponseDraft::default(),
        }
    }

    pub fn head(&self) -> &Parts {
        &self.head
    }

    /// Hand out the request body. Returns `None` once it has been taken.
    pub fn take_body(&mut self) -> Option<RequestBody> {
        self.body.take()
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn response(&self) -> &ResponseDraft {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseDraft {
        &mut self.response
    }

    /// Finish the exchange.
    pub fn into_response(self) -> Response {
        self.response.into_response()
    }
}

impl ExchangeContext for Exchange {
    fn method(&self) -> &Method {
        &self.head.method
    }

    fn uri(&self) -> &Uri {
        &self.head.uri
    }

    fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }
}

/// Mutable response state: status, headers and the output stream.
#[derive(Debug)]
pub struct ResponseDraft {
    status: StatusCode,
    headers: HeaderMap,
    output: Vec<u8>,
}

impl Default for ResponseDraft {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            output: Vec::new(),
        }
    }
}

impl ResponseDraft {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Replace a header with a textual value.
    ///
    /// Names are matched case-insensitively, so the spellings in
    /// `crate::http::headers` can be passed directly.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ExchangeError::InvalidHeaderName(name.to_string()))?;
        let value = HeaderValue::from_str(value).map_err(|source| ExchangeError::InvalidHeaderValue {
            name: name.to_string(),
            source,
        })?;
        self.headers.insert(header, value);
        Ok(())
    }

    /// The response output stream.
    pub fn output_mut(&mut self) -> &mut impl std::io::Write {
        &mut self.output
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Swap the buffered output, e.g. after compressing it.
    pub fn replace_output(&mut self, output: Vec<u8>) -> Vec<u8> {
        std::mem::replace(&mut self.output, output)
    }

    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.output));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// A request declares a body through a positive `Content-Length` or any
/// `Transfer-Encoding`.
fn declares_entity_body(headers: &HeaderMap) -> bool {
    if headers.contains_key(axum::http::header::TRANSFER_ENCODING) {
        return true;
    }
    headers
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|len| len > 0)
        .unwrap_or(false)
}

/// Reconstruct the absolute URL of the request.
///
/// Absolute-form targets are taken as-is. Origin-form targets combine the
/// context scheme with the `Host` header; without a usable `Host` there is
/// no URL.
pub fn request_url<C: ExchangeContext + ?Sized>(ctx: &C) -> Option<Url> {
    let uri = ctx.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        return Url::parse(&uri.to_string()).ok();
    }

    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let host = ctx
        .headers()
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())?;

    let url = Url::parse(&format!("{}://{}{}", ctx.scheme(), host, path)).ok()?;
    url.host().is_some().then_some(url)
}
