//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Server and middleware produce:
//!     → tracing events with structured fields (request id, method, path)
//!     → TraceLayer spans per request
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, plain or JSON)
//! ```

pub mod logging;

pub use logging::init_logging;
