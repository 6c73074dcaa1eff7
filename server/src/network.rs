//! WebSocket relay: accepts peers, hands out identities and fans out updates

use crate::client_manager::ClientManager;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{Envelope, Message, MessageType, PlayerConnected, PlayerId};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// Relay server. It keeps the last known position of every peer but runs no
/// simulation of its own.
pub struct Server {
    listener: TcpListener,
    clients: Arc<RwLock<ClientManager>>,
}

impl Server {
    pub async fn bind(addr: &str, max_clients: usize) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            clients: Arc::new(RwLock::new(ClientManager::new(max_clients))),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared handle onto the roster, mostly for inspection in tests.
    pub fn clients(&self) -> Arc<RwLock<ClientManager>> {
        Arc::clone(&self.clients)
    }

    /// Accepts connections forever, one task per peer.
    pub async fn run(self) -> std::io::Result<()> {
        info!("Server started successfully");

        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            let clients = Arc::clone(&self.clients);
            tokio::spawn(async move {
                handle_connection(stream, addr, clients).await;
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    clients: Arc<RwLock<ClientManager>>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws_stream) => ws_stream,
        Err(e) => {
            warn!("WebSocket handshake with {} failed: {}", addr, e);
            return;
        }
    };
    let (mut write, mut read) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Envelope>();

    // The roster guard is released before any await on the socket.
    let registered = {
        let mut clients = clients.write().await;
        register_peer(&mut clients, tx)
    };
    let Some(player_id) = registered else {
        warn!("Rejecting {}: server full", addr);
        let _ = write.send(WsMessage::Close(None)).await;
        return;
    };
    debug!("Player {} bound to {}", player_id, addr);

    let writer = tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            let bytes = match envelope.to_bytes() {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Failed to frame message for player {}: {}", player_id, e);
                    continue;
                }
            };
            if let Err(e) = write.send(WsMessage::Binary(bytes)).await {
                debug!("Writer for player {} stopped: {}", player_id, e);
                break;
            }
        }
    });

    while let Some(frame) = read.next().await {
        match frame {
            Ok(WsMessage::Binary(bytes)) => relay_frame(&clients, player_id, &bytes).await,
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Read from player {} failed: {}", player_id, e);
                break;
            }
        }
    }

    clients.write().await.remove_client(player_id);
    writer.abort();
}

/// Registers a new peer, queues its handshake and announces it to everyone
/// else, all under the caller's roster lock so every peer sees the same join
/// order. Returns `None` when the roster is full.
fn register_peer(
    clients: &mut ClientManager,
    tx: mpsc::UnboundedSender<Envelope>,
) -> Option<PlayerId> {
    let (player_id, establish) = clients.add_client(tx)?;

    match Message::EstablishConnection(establish).to_envelope() {
        Ok(envelope) => clients.send_to(player_id, envelope),
        Err(e) => {
            error!("Failed to encode handshake for player {}: {}", player_id, e);
            clients.remove_client(player_id);
            return None;
        }
    }

    let joined = PlayerConnected {
        player_id,
        position: clients.position_of(player_id).unwrap_or_default(),
    };
    if let Ok(envelope) = Envelope::wrap(MessageType::PlayerConnected, &joined) {
        clients.broadcast(&envelope, Some(player_id));
    }

    Some(player_id)
}

/// Records and relays an `UpdatePosition` from `sender` about itself.
/// Updates naming another player, and anything else from a peer, are dropped.
async fn relay_frame(clients: &RwLock<ClientManager>, sender: PlayerId, bytes: &[u8]) {
    let envelope = match Envelope::from_bytes(bytes) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("Malformed frame from player {}: {}", sender, e);
            return;
        }
    };

    match Message::from_envelope(&envelope) {
        Ok(Some(Message::UpdatePosition(update))) if update.player_id != sender => {
            warn!(
                "Player {} sent an update for player {}, dropping",
                sender, update.player_id
            );
        }
        Ok(Some(Message::UpdatePosition(update))) => {
            let mut clients = clients.write().await;
            clients.update_position(update.player_id, update.position);
            clients.broadcast(&envelope, Some(sender));
        }
        Ok(Some(other)) => {
            warn!(
                "Unexpected {} from player {}",
                other.message_type().tag(),
                sender
            );
        }
        Ok(None) => {
            debug!(
                "Ignoring unrecognized message type {} from player {}",
                envelope.message_type, sender
            );
        }
        Err(e) => warn!("Dropping {} from player {}: {}", envelope.message_type, sender, e),
    }
}
