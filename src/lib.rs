//! Request-context helpers for an embedded HTTP server.
//!
//! Handlers receive an [`Exchange`] and use the free functions in
//! [`exchange`], [`content`], [`session`] and [`diagnostics`] to read input
//! and shape output. [`http::HttpServer`] wires them into an axum service.

pub mod config;
pub mod content;
pub mod diagnostics;
pub mod error;
pub mod exchange;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;

pub use config::ServerConfig;
pub use error::ExchangeError;
pub use exchange::{Exchange, ExchangeContext, ExchangeExt, HttpVerb, ResponseComposer};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use session::{SessionHost, SessionHostExt, SessionProvider, SessionRecord};
