//! Request handlers built on the exchange helpers.
//!
//! Each handler wraps the request in an `Exchange`, runs its logic against
//! it, and turns the exchange back into a response. Uncaught exchange errors
//! become the 500 page.

use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::content::{hash_md5, hash_md5_str, parse_json, prettify_json, try_compress};
use crate::diagnostics::exception_message;
use crate::error::{ExchangeError, Result};
use crate::exchange::{
    request::request_body,
    response::{no_cache, redirect as redirect_to, write_not_found, write_server_error},
    Exchange, ExchangeExt, WebSocketContext,
};
use crate::http::headers::{CONTENT_ENCODING, ETAG, IF_NONE_MATCH};
use crate::http::server::AppState;
use crate::session::{get_session, get_websocket_session, SessionRecord};

const REQUEST_ID: &str = "x-request-id";

/// Turn a finished exchange into a response, rendering the 500 page on error.
fn finish(mut exchange: Exchange, result: Result<()>) -> Response {
    if let Err(err) = result {
        tracing::error!(
            request_id = %exchange.request_header(REQUEST_ID),
            path = %exchange.request_path(),
            error = %exception_message(&err),
            "Handler failed"
        );
        if write_server_error(&mut exchange, &err).is_err() {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    exchange.into_response()
}

fn bad_request(state: &AppState, exchange: &mut Exchange, message: String) -> Result<()> {
    exchange.response_mut().set_status(StatusCode::BAD_REQUEST);
    state.composer.json_response(exchange, &json!({ "error": message }))
}

#[derive(Debug, Serialize)]
struct RequestInfo {
    verb: String,
    path: String,
    url: Option<String>,
    user_agent: String,
    has_body: bool,
    session: Option<String>,
}

/// Describe the request as the helpers see it.
pub async fn info(State(state): State<AppState>, request: Request<Body>) -> Response {
    let mut exchange = state.exchange(request);
    let result = info_inner(&state, &mut exchange);
    finish(exchange, result)
}

fn info_inner(state: &AppState, exchange: &mut Exchange) -> Result<()> {
    let info = RequestInfo {
        verb: exchange.request_verb().to_string(),
        path: exchange.request_path(),
        url: crate::exchange::request_url(&*exchange).map(|u| u.to_string()),
        user_agent: exchange.request_header(header::USER_AGENT.as_str()),
        has_body: exchange.has_body(),
        session: get_session(exchange, &state.sessions).map(|s| s.id().to_string()),
    };
    no_cache(exchange)?;
    state.composer.json_response(exchange, &info)
}

#[derive(Debug, Deserialize)]
struct EchoRequest {
    message: String,
    #[serde(default = "default_repeat")]
    repeat: usize,
}

fn default_repeat() -> usize {
    1
}

#[derive(Debug, Serialize)]
struct EchoResponse {
    message: String,
    length: usize,
    md5: String,
}

/// Echo a JSON message back, gzip-compressed when the client accepts it.
pub async fn echo(State(state): State<AppState>, request: Request<Body>) -> Response {
    let mut exchange = state.exchange(request);
    let result = echo_inner(&state, &mut exchange).await;
    finish(exchange, result)
}

async fn echo_inner(state: &AppState, exchange: &mut Exchange) -> Result<()> {
    let parsed = match parse_json::<EchoRequest>(exchange, state.exchange.max_body_bytes).await {
        Ok(Some(req)) => req,
        Ok(None) => return bad_request(state, exchange, "request body required".into()),
        Err(ExchangeError::Json(e)) => return bad_request(state, exchange, e.to_string()),
        Err(e) => return Err(e),
    };

    let message = parsed.message.repeat(parsed.repeat.clamp(1, 16));
    let response = EchoResponse {
        length: message.chars().count(),
        md5: hash_md5_str(&message),
        message,
    };
    state.composer.json_response(exchange, &response)?;

    if exchange.accepts_encoding("gzip") {
        let compressed = try_compress(exchange.response().output())?;
        let response = exchange.response_mut();
        response.replace_output(compressed);
        response.set_header(CONTENT_ENCODING, "gzip")?;
    }
    Ok(())
}

/// Pretty-print the JSON request body.
pub async fn prettify(State(state): State<AppState>, request: Request<Body>) -> Response {
    let mut exchange = state.exchange(request);
    let result = prettify_inner(&state, &mut exchange).await;
    finish(exchange, result)
}

async fn prettify_inner(state: &AppState, exchange: &mut Exchange) -> Result<()> {
    let Some(body) = request_body(exchange, state.exchange.max_body_bytes).await? else {
        return bad_request(state, exchange, "request body required".into());
    };
    match prettify_json(&body) {
        Ok(pretty) => crate::exchange::response::json_text_response(exchange, &pretty),
        Err(ExchangeError::Json(e)) => bad_request(state, exchange, e.to_string()),
        Err(e) => Err(e),
    }
}

/// MD5 of the `text` query parameter, with ETag revalidation.
pub async fn hash(State(state): State<AppState>, request: Request<Body>) -> Response {
    let mut exchange = state.exchange(request);
    let result = hash_inner(&state, &mut exchange);
    finish(exchange, result)
}

fn hash_inner(state: &AppState, exchange: &mut Exchange) -> Result<()> {
    let Some(text) = exchange.query_string("text") else {
        return bad_request(state, exchange, "missing query parameter: text".into());
    };

    let digest = hash_md5(text.as_bytes());
    let etag = format!("\"{digest}\"");
    exchange.response_mut().set_header(ETAG, &etag)?;

    let presented = exchange.request_header(IF_NONE_MATCH);
    if presented.split(',').any(|tag| tag.trim() == etag || tag.trim() == "*") {
        tracing::debug!(etag = %etag, "Client copy still valid");
        exchange.response_mut().set_status(StatusCode::NOT_MODIFIED);
        return Ok(());
    }

    state
        .composer
        .json_response(exchange, &json!({ "text": text, "md5": digest }))
}

/// Redirect to `to`, optionally absolutised with `absolute=true`.
pub async fn redirect(State(state): State<AppState>, request: Request<Body>) -> Response {
    let mut exchange = state.exchange(request);
    let result = redirect_inner(&state, &mut exchange);
    finish(exchange, result)
}

fn redirect_inner(state: &AppState, exchange: &mut Exchange) -> Result<()> {
    let Some(target) = exchange.query_string("to").filter(|t| !t.is_empty()) else {
        return bad_request(state, exchange, "missing query parameter: to".into());
    };
    let absolute = exchange
        .query_string("absolute")
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false);
    redirect_to(exchange, &target, absolute)
}

fn session_json(session: Option<&SessionRecord>) -> serde_json::Value {
    match session {
        Some(record) => json!({
            "id": record.id(),
            "created_at": record.created_at().to_rfc3339(),
            "values": record.len(),
        }),
        None => serde_json::Value::Null,
    }
}

/// Report the session attached to the request, if any.
pub async fn session(State(state): State<AppState>, request: Request<Body>) -> Response {
    let mut exchange = state.exchange(request);
    let record = get_session(&exchange, &state.sessions);
    let result = no_cache(&mut exchange).and_then(|_| {
        state
            .composer
            .json_response(&mut exchange, &json!({ "session": session_json(record.as_deref()) }))
    });
    finish(exchange, result)
}

/// Upgrade to a websocket that greets with the session and echoes text.
pub async fn websocket(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let ctx = WebSocketContext::from_head(method, uri, headers, state.scheme.clone());
    let session = get_websocket_session(&ctx, &state.sessions);
    let greeting = json!({ "session": session_json(session.as_deref()) }).to_string();

    ws.on_upgrade(move |socket| echo_socket(socket, greeting))
}

async fn echo_socket(mut socket: WebSocket, greeting: String) {
    if socket.send(Message::Text(greeting.into())).await.is_err() {
        return;
    }
    while let Some(message) = socket.recv().await {
        let message = match message {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!(error = %e, "Websocket receive failed");
                return;
            }
        };
        match message {
            Message::Text(text) => {
                if socket.send(Message::Text(text)).await.is_err() {
                    return;
                }
            }
            Message::Close(_) => return,
            _ => {}
        }
    }
}

/// Fallback for unknown routes.
pub async fn not_found(State(state): State<AppState>, request: Request<Body>) -> Response {
    let mut exchange = state.exchange(request);
    tracing::debug!(
        request_id = %exchange.request_header(REQUEST_ID),
        verb = %exchange.request_verb(),
        path = %exchange.request_path(),
        "No route matched"
    );
    let result = write_not_found(&mut exchange);
    finish(exchange, result)
}
