//! HTTP surface: shared vocabulary plus the embedded server.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → handlers.rs (wrap request in Exchange, run helpers)
//!     → headers.rs / pages.rs (shared header names, fixed pages)
//!     → Send to client
//! ```

pub mod handlers;
pub mod headers;
pub mod pages;
pub mod server;

pub use server::{AppState, HttpServer, ServerSessions};
