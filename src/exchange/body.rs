//! Single-pass request body.

use axum::body::Body;
use axum::http::{header, HeaderMap};
use futures_util::StreamExt;

use crate::error::{ExchangeError, Result};

/// Text encodings recognised in the `Content-Type` charset parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl Charset {
    /// Charset declared by the request, UTF-8 when absent or unknown.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_param)
            .map(|name| Self::from_label(&name))
            .unwrap_or_default()
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "us-ascii" | "ascii" => Charset::Ascii,
            "iso-8859-1" | "latin1" | "iso_8859-1" | "l1" => Charset::Latin1,
            _ => Charset::Utf8,
        }
    }

    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
            Charset::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

/// The unread body of a request.
///
/// Reading consumes the value, so a body cannot be read twice.
#[derive(Debug)]
pub struct RequestBody {
    body: Body,
    charset: Charset,
}

impl RequestBody {
    pub fn new(body: Body, charset: Charset) -> Self {
        Self { body, charset }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Collect the raw bytes, failing once more than `limit` bytes arrive.
    pub async fn read_bytes(self, limit: usize) -> Result<Vec<u8>> {
        let mut stream = self.body.into_data_stream();
        let mut buf = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ExchangeError::Body)?;
            if buf.len() + chunk.len() > limit {
                return Err(ExchangeError::BodyTooLarge { limit });
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(buf)
    }

    /// Read the whole body as text using the declared charset.
    pub async fn read_text(self, limit: usize) -> Result<String> {
        let charset = self.charset;
        let bytes = self.read_bytes(limit).await?;
        Ok(charset.decode(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_charset_detection() {
        assert_eq!(Charset::from_headers(&HeaderMap::new()), Charset::Utf8);
        assert_eq!(Charset::from_headers(&headers_with("text/plain")), Charset::Utf8);
        assert_eq!(
            Charset::from_headers(&headers_with("text/plain; charset=ISO-8859-1")),
            Charset::Latin1
        );
        assert_eq!(
            Charset::from_headers(&headers_with("text/plain;charset=\"us-ascii\"")),
            Charset::Ascii
        );
        assert_eq!(
            Charset::from_headers(&headers_with("text/plain; charset=klingon")),
            Charset::Utf8
        );
    }

    #[test]
    fn test_decode() {
        assert_eq!(Charset::Latin1.decode(&[0x63, 0x61, 0x66, 0xe9]), "café");
        assert_eq!(Charset::Ascii.decode(&[0x63, 0x61, 0x66, 0xe9]), "caf?");
        assert_eq!(Charset::Utf8.decode("café".as_bytes()), "café");
    }

    #[tokio::test]
    async fn test_read_text() {
        let body = RequestBody::new(Body::from("hello"), Charset::Utf8);
        assert_eq!(body.read_text(1024).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_read_over_limit() {
        let body = RequestBody::new(Body::from("hello world"), Charset::Utf8);
        let err = body.read_bytes(4).await.unwrap_err();
        assert!(matches!(err, ExchangeError::BodyTooLarge { limit: 4 }));
    }
}
