//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use exchange_context::config::ServerConfig;
use exchange_context::exchange::ExchangeContext;
use exchange_context::session::{session_cookie, SessionProvider, SessionRecord};
use exchange_context::{HttpServer, Shutdown};
use tokio::net::TcpListener;

/// Looks sessions up by the `sid` cookie in a fixed table.
#[allow(dead_code)]
pub struct FixedSessions {
    records: HashMap<String, Arc<SessionRecord>>,
}

#[allow(dead_code)]
impl FixedSessions {
    pub fn with(ids: &[&str]) -> Self {
        let records = ids
            .iter()
            .map(|id| (id.to_string(), Arc::new(SessionRecord::new(*id))))
            .collect();
        Self { records }
    }
}

impl SessionProvider for FixedSessions {
    fn session_for(&self, ctx: &dyn ExchangeContext) -> Option<Arc<SessionRecord>> {
        let token = session_cookie(ctx, "sid")?;
        self.records.get(&token).cloned()
    }
}

/// A running server bound to an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the server with `config`, optionally with a session provider.
pub async fn start_server(config: ServerConfig, sessions: Option<Arc<dyn SessionProvider>>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut server = HttpServer::new(config);
    if let Some(provider) = sessions {
        server = server.with_session_provider(provider);
    }

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Give the accept loop a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, shutdown }
}

/// Client that neither follows redirects nor uses a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
