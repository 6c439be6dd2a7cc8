//! HTTP verb classification.

use std::fmt;
use std::str::FromStr;

use axum::http::Method;

/// The verbs request handlers route on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpVerb {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
}

/// Returned by the strict parser for tokens outside `HttpVerb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised HTTP verb: {0:?}")]
pub struct UnknownVerb(pub String);

impl HttpVerb {
    /// Parse a method token, falling back to `Get` for anything unknown.
    ///
    /// Routing relies on this never failing, so malformed or exotic verbs
    /// (e.g. `PATCH`) are treated as `GET`.
    pub fn parse_lenient(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Head => "HEAD",
            HttpVerb::Options => "OPTIONS",
        }
    }
}

impl FromStr for HttpVerb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        [
            HttpVerb::Get,
            HttpVerb::Post,
            HttpVerb::Put,
            HttpVerb::Delete,
            HttpVerb::Head,
            HttpVerb::Options,
        ]
        .into_iter()
        .find(|verb| verb.as_str().eq_ignore_ascii_case(token))
        .ok_or_else(|| UnknownVerb(s.to_string()))
    }
}

impl From<&Method> for HttpVerb {
    fn from(method: &Method) -> Self {
        HttpVerb::parse_lenient(method.as_str())
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
