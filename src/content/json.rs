//! JSON bridge between request bodies and typed values.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::exchange::{request::request_body, Exchange};

/// Deserialise the request body into `T`.
///
/// `None` when the request has no body. Malformed JSON and shape mismatches
/// are returned as errors.
pub async fn parse_json<T: DeserializeOwned>(exchange: &mut Exchange, limit: usize) -> Result<Option<T>> {
    match request_body(exchange, limit).await? {
        Some(body) => Ok(Some(serde_json::from_str(&body)?)),
        None => Ok(None),
    }
}

/// Serialise `data`, indented with two spaces when `pretty` is set.
pub fn to_json_text<T: Serialize + ?Sized>(data: &T, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    Ok(text)
}

/// Re-indent arbitrary JSON text.
pub fn prettify_json(json: &str) -> Result<String> {
    let value: Value = serde_json::from_str(json)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
