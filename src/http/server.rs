//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request id, tracing, timeout, body limit)
//! - Hold the session host shared by handlers
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ExchangeConfig, ServerConfig};
use crate::exchange::{Exchange, ResponseComposer};
use crate::http::handlers;
use crate::lifecycle::shutdown::wait_for;
use crate::session::{SessionHost, SessionProvider};

/// Session capability of the server. Empty unless a provider is installed.
#[derive(Clone, Default)]
pub struct ServerSessions {
    provider: Option<Arc<dyn SessionProvider>>,
}

impl ServerSessions {
    pub fn new(provider: Option<Arc<dyn SessionProvider>>) -> Self {
        Self { provider }
    }
}

impl SessionHost for ServerSessions {
    fn session_provider(&self) -> Option<&dyn SessionProvider> {
        self.provider.as_deref()
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub exchange: ExchangeConfig,
    pub composer: ResponseComposer,
    pub scheme: String,
    pub sessions: ServerSessions,
}

impl AppState {
    /// Wrap an incoming request for the helpers in `crate::exchange`.
    pub fn exchange(&self, request: Request<Body>) -> Exchange {
        Exchange::from_request(request, self.scheme.clone())
    }
}

/// Embedded HTTP server exposing the exchange helpers.
pub struct HttpServer {
    config: ServerConfig,
    sessions: ServerSessions,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            sessions: ServerSessions::default(),
        }
    }

    /// Install the provider used for session lookups.
    pub fn with_session_provider(mut self, provider: Arc<dyn SessionProvider>) -> Self {
        self.sessions = ServerSessions::new(Some(provider));
        self
    }

    fn state(&self) -> AppState {
        AppState {
            exchange: self.config.exchange.clone(),
            composer: ResponseComposer::from_config(&self.config.exchange),
            scheme: self.config.listener.scheme.clone(),
            sessions: self.sessions.clone(),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(self.config.exchange.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id());

        Router::new()
            .route("/api/info", get(handlers::info))
            .route("/api/echo", post(handlers::echo))
            .route("/api/prettify", post(handlers::prettify))
            .route("/api/hash", get(handlers::hash))
            .route("/api/redirect", get(handlers::redirect))
            .route("/api/session", get(handlers::session))
            .route("/ws", get(handlers::websocket))
            .fallback(handlers::not_found)
            .with_state(self.state())
            .layer(middleware)
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            scheme = %self.config.listener.scheme,
            sessions = self.sessions.provider.is_some(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
