//! Error types for exchange handling.

use thiserror::Error;

/// Failures raised while reading from or writing to an exchange.
///
/// Absence (missing header, missing query key, missing body, missing session)
/// is never an error; those are reported through `Option` or empty strings.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The request body stream failed mid-read.
    #[error("failed to read request body")]
    Body(#[source] axum::Error),

    /// The request body exceeded the configured limit.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Writing to the response output failed.
    #[error("failed to write response output")]
    Io(#[from] std::io::Error),

    /// Malformed JSON or a JSON shape that does not fit the target type.
    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),

    /// A header name contained characters not allowed on the wire.
    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),

    /// A header value could not be represented on the wire.
    #[error("invalid value for header {name}")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: axum::http::header::InvalidHeaderValue,
    },
}

pub type Result<T, E = ExchangeError> = std::result::Result<T, E>;
