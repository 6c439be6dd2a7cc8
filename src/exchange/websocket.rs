//! Context of an upgraded websocket request.

use axum::http::{request::Parts, HeaderMap, Method, Uri};

use crate::exchange::ExchangeContext;

/// The head of the request that was upgraded to a websocket.
///
/// Frames are owned by the socket itself; this only keeps what lookups such
/// as session resolution need.
#[derive(Debug, Clone)]
pub struct WebSocketContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    scheme: String,
}

impl WebSocketContext {
    pub fn new(parts: &Parts, scheme: impl Into<String>) -> Self {
        Self::from_head(parts.method.clone(), parts.uri.clone(), parts.headers.clone(), scheme)
    }

    /// Build from head pieces extracted individually, as axum handlers
    /// receive them next to `WebSocketUpgrade`.
    pub fn from_head(method: Method, uri: Uri, headers: HeaderMap, scheme: impl Into<String>) -> Self {
        Self {
            method,
            uri,
            headers,
            scheme: scheme.into(),
        }
    }
}

impl ExchangeContext for WebSocketContext {
    fn method(&self) -> &Method {
        &self.method
    }

    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::ExchangeExt;
    use axum::body::Body;
    use axum::http::Request;

    #[test]
    fn test_context_exposes_upgrade_head() {
        let (parts, _) = Request::builder()
            .uri("/WS?room=lobby")
            .header("Upgrade", "websocket")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let ctx = WebSocketContext::new(&parts, "http");

        assert_eq!(ctx.request_path(), "/ws");
        assert_eq!(ctx.query_string("room").as_deref(), Some("lobby"));
        assert_eq!(ctx.request_header("upgrade"), "websocket");
    }
}
