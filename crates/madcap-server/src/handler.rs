//! Per-connection lobby handler.
//!
//! Each accepted WebSocket gets its own task running this handler. The
//! core only depends on one lifecycle guarantee from the transport: when
//! the connection goes away — cleanly, with an error, or by panic — the
//! participant leaves its session. A drop guard provides that.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use madcap_auth::CredentialStore;
use madcap_protocol::{ConnectionId, LobbyReply, LobbyRequest};
use madcap_session::SessionStore;
use tokio_tungstenite::tungstenite::Message;

use crate::{ServerCore, ServerError};

type WsStream = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

/// Drop guard that removes the connection from its session when the
/// handler exits, for any reason. `Drop` is synchronous, so the actual
/// leave runs in a fire-and-forget task.
struct LeaveGuard<S: CredentialStore + SessionStore> {
    conn: ConnectionId,
    core: Arc<ServerCore<S>>,
}

impl<S: CredentialStore + SessionStore> Drop for LeaveGuard<S> {
    fn drop(&mut self) {
        let conn = self.conn;
        let core = Arc::clone(&self.core);
        // During runtime shutdown there is no handle to spawn on; the
        // directory is being torn down with the process, so skipping the
        // leave is correct rather than panicking.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                core.disconnect(conn).await;
            });
        }
    }
}

/// Handles one lobby connection from accept to close.
pub(crate) async fn handle_connection<S>(
    mut ws: WsStream,
    conn: ConnectionId,
    core: Arc<ServerCore<S>>,
) -> Result<(), ServerError>
where
    S: CredentialStore + SessionStore,
{
    let _guard = LeaveGuard {
        conn,
        core: Arc::clone(&core),
    };

    while let Some(msg) = ws.next().await {
        let msg = msg.map_err(|e| ServerError::Transport(e.to_string()))?;

        let data: Vec<u8> = match msg {
            Message::Binary(data) => data.into(),
            Message::Text(text) => text.as_bytes().to_vec(),
            Message::Close(_) => break,
            _ => continue, // ping/pong/frame
        };

        let request = match LobbyRequest::from_bytes(&data) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(%conn, error = %e, "undecodable lobby message");
                send_error(&mut ws, 400, &e.to_string()).await?;
                continue;
            }
        };

        match request {
            LobbyRequest::Join {
                session_id,
                display_name,
            } => {
                let result = core
                    .join_session(&session_id, conn, display_name)
                    .await;
                match result {
                    Ok(participants) => {
                        send_reply(
                            &mut ws,
                            &LobbyReply::Joined {
                                session_id,
                                participants,
                            },
                        )
                        .await?;
                    }
                    Err(e) => {
                        send_error(&mut ws, e.status_code(), &e.to_string())
                            .await?;
                    }
                }
            }

            LobbyRequest::Leave => {
                core.disconnect(conn).await;
            }
        }
    }

    // _guard drops here → leave fires (a no-op if already left).
    Ok(())
}

async fn send_reply(
    ws: &mut WsStream,
    reply: &LobbyReply,
) -> Result<(), ServerError> {
    let bytes = reply.to_bytes()?;
    ws.send(Message::Binary(bytes.into()))
        .await
        .map_err(|e| ServerError::Transport(e.to_string()))
}

async fn send_error(
    ws: &mut WsStream,
    code: u16,
    message: &str,
) -> Result<(), ServerError> {
    send_reply(
        ws,
        &LobbyReply::Error {
            code,
            message: message.to_string(),
        },
    )
    .await
}
