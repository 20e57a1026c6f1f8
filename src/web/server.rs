//! Web server for HyperChat.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{ServerConfig, WebConfig};
use crate::{HyperChatError, Result};

use super::router::create_router;
use super::ws::ChatWsState;

/// Web server for the chat front end.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// WebSocket handler state.
    state: Arc<ChatWsState>,
    /// Web configuration.
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(server: &ServerConfig, web: &WebConfig, state: ChatWsState) -> Result<Self> {
        let addr = format!("{}:{}", server.host, server.port)
            .parse::<SocketAddr>()
            .map_err(|e| {
                HyperChatError::Config(format!(
                    "invalid server address {}:{}: {e}",
                    server.host, server.port
                ))
            })?;

        Ok(Self {
            addr,
            state: Arc::new(state),
            web_config: web.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.state, &self.web_config);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Start the server in the background and return the bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = create_router(self.state, &self.web_config);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatHub, MessagePipeline, SqliteMessageStore};
    use crate::config::ChatConfig;
    use crate::db::Database;

    async fn setup_state() -> ChatWsState {
        let hub = Arc::new(ChatHub::new());
        let store = Arc::new(SqliteMessageStore::new(
            Database::open_in_memory().await.unwrap(),
        ));
        let pipeline =
            MessagePipeline::from_config(&ChatConfig::default(), hub.clone(), store).unwrap();
        ChatWsState::new(Arc::new(pipeline), hub)
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let server = ServerConfig {
            host: "not an address".to_string(),
            port: 3000,
        };
        let result = WebServer::new(&server, &WebConfig::default(), setup_state().await);
        assert!(matches!(result, Err(HyperChatError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_with_addr_binds_ephemeral_port() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let web = WebConfig {
            serve_static: false,
            ..WebConfig::default()
        };
        let server = WebServer::new(&server, &web, setup_state().await).unwrap();
        assert_eq!(server.addr().port(), 0);

        let addr = server.run_with_addr().await.unwrap();
        assert_ne!(addr.port(), 0);
    }
}
