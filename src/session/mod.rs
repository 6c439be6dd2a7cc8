//! Session resolution.
//!
//! # Data Flow
//! ```text
//! Exchange / WebSocketContext
//!     → get_session / get_websocket_session / SessionHostExt::session
//!     → SessionHost::session_provider (None → no session)
//!     → SessionProvider::session_for (lookup by token, e.g. cookie)
//!     → Arc<SessionRecord> borrowed for the duration of the handler
//! ```
//!
//! # Design Decisions
//! - A missing provider or missing session is `None`, never an error
//! - The context is passed to the provider unchanged
//! - Record lifecycle (creation, expiry, persistence) belongs to the provider

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;

use crate::exchange::{Exchange, ExchangeContext, WebSocketContext};

/// Key-value state for one client.
#[derive(Debug)]
pub struct SessionRecord {
    id: String,
    created_at: DateTime<Utc>,
    values: DashMap<String, Value>,
}

impl SessionRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            values: DashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).map(|r| r.value().clone())
    }

    /// Store a value, returning the previous one.
    pub fn set(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.values.remove(key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Looks up the session that belongs to a request.
pub trait SessionProvider: Send + Sync {
    fn session_for(&self, ctx: &dyn ExchangeContext) -> Option<Arc<SessionRecord>>;
}

/// Server-level object that may carry a session provider.
pub trait SessionHost {
    fn session_provider(&self) -> Option<&dyn SessionProvider>;
}

/// Resolve a session for any request context.
pub fn resolve_session<H, C>(ctx: &C, host: &H) -> Option<Arc<SessionRecord>>
where
    H: SessionHost + ?Sized,
    C: ExchangeContext,
{
    host.session_provider()?.session_for(ctx)
}

/// Session of an HTTP exchange.
pub fn get_session<H: SessionHost + ?Sized>(exchange: &Exchange, host: &H) -> Option<Arc<SessionRecord>> {
    resolve_session(exchange, host)
}

/// Session of an upgraded websocket.
pub fn get_websocket_session<H: SessionHost + ?Sized>(
    ctx: &WebSocketContext,
    host: &H,
) -> Option<Arc<SessionRecord>> {
    resolve_session(ctx, host)
}

/// Host-first spelling of the lookup.
pub trait SessionHostExt: SessionHost {
    fn session<C: ExchangeContext>(&self, ctx: &C) -> Option<Arc<SessionRecord>> {
        resolve_session(ctx, self)
    }
}

impl<T: SessionHost + ?Sized> SessionHostExt for T {}

/// Value of the named cookie carried by the request.
pub fn session_cookie(ctx: &dyn ExchangeContext, name: &str) -> Option<String> {
    ctx.headers()
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
}
