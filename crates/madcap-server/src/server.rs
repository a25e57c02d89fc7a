//! `MadcapServer` builder and accept loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use madcap_auth::{AuthConfig, CredentialStore};
use madcap_protocol::ConnectionId;
use madcap_session::SessionStore;
use tokio::net::TcpListener;

use crate::handler::handle_connection;
use crate::{ServerCore, ServerError};

/// Counter for assigning unique connection ids.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Builder for configuring and starting a Madcap server.
///
/// # Example
///
/// ```rust,ignore
/// let server = MadcapServer::builder()
///     .bind("0.0.0.0:3000")
///     .build(MemoryStore::new())
///     .await?;
/// server.run().await
/// ```
pub struct MadcapServerBuilder {
    bind_addr: String,
    auth_config: AuthConfig,
}

impl MadcapServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            auth_config: AuthConfig::default(),
        }
    }

    /// Sets the address to bind the lobby listener to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the token configuration.
    pub fn auth_config(mut self, config: AuthConfig) -> Self {
        self.auth_config = config;
        self
    }

    /// Binds the listener and builds the server around `store`.
    pub async fn build<S>(
        self,
        store: S,
    ) -> Result<MadcapServer<S>, ServerError>
    where
        S: CredentialStore + SessionStore,
    {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "lobby listener bound");

        Ok(MadcapServer {
            listener,
            core: Arc::new(ServerCore::new(self.auth_config, store)),
        })
    }
}

impl Default for MadcapServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Madcap server: the shared [`ServerCore`] plus the WebSocket
/// accept loop feeding it connection-lifecycle events.
pub struct MadcapServer<S> {
    listener: TcpListener,
    core: Arc<ServerCore<S>>,
}

impl<S: CredentialStore + SessionStore> MadcapServer<S> {
    /// Creates a new builder.
    pub fn builder() -> MadcapServerBuilder {
        MadcapServerBuilder::new()
    }

    /// Returns a handle to the server core, for request handlers that
    /// live outside the lobby loop (login/register endpoints, tests).
    pub fn core(&self) -> Arc<ServerCore<S>> {
        Arc::clone(&self.core)
    }

    /// Returns the local address the lobby listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop: each connection is upgraded to a WebSocket,
    /// assigned a [`ConnectionId`], and handled in its own task. Runs
    /// until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("madcap server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let core = Arc::clone(&self.core);
                    tokio::spawn(async move {
                        let ws = match tokio_tungstenite::accept_async(
                            stream,
                        )
                        .await
                        {
                            Ok(ws) => ws,
                            Err(e) => {
                                tracing::debug!(
                                    %addr,
                                    error = %e,
                                    "websocket upgrade failed"
                                );
                                return;
                            }
                        };

                        let conn = ConnectionId::new(
                            NEXT_CONNECTION_ID
                                .fetch_add(1, Ordering::Relaxed),
                        );
                        tracing::debug!(%conn, %addr, "lobby connection accepted");

                        if let Err(e) =
                            handle_connection(ws, conn, core).await
                        {
                            tracing::debug!(
                                %conn,
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
