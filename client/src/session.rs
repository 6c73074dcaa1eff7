//! WebSocket session: one persistent connection, binary envelopes both ways

use crate::error::ClientError;
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use shared::Envelope;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// An open connection to the server, not yet split into its two halves.
pub struct Session {
    sender: SessionSender,
    receiver: SessionReceiver,
}

impl Session {
    /// Dials `url` once. There is no retry; a failure here is fatal to the
    /// caller.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (stream, _response) =
            connect_async(url)
                .await
                .map_err(|source| ClientError::ConnectionFailed {
                    url: url.to_string(),
                    source,
                })?;
        info!("Connected to {}", url);

        let (mut write, read) = stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<Envelope>();

        tokio::spawn(async move {
            while let Some(envelope) = rx.recv().await {
                let bytes = match envelope.to_bytes() {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("Failed to frame {} message: {}", envelope.message_type, e);
                        continue;
                    }
                };

                if let Err(e) = write.send(Message::Binary(bytes)).await {
                    debug!("Session writer stopped: {}", e);
                    break;
                }
            }
        });

        Ok(Self {
            sender: SessionSender::new(tx),
            receiver: SessionReceiver { stream: read },
        })
    }

    pub fn receiver(&mut self) -> &mut SessionReceiver {
        &mut self.receiver
    }

    pub fn split(self) -> (SessionSender, SessionReceiver) {
        (self.sender, self.receiver)
    }
}

/// Fire-and-forget handle onto the session's writer task.
#[derive(Debug, Clone)]
pub struct SessionSender {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl SessionSender {
    pub fn new(tx: mpsc::UnboundedSender<Envelope>) -> Self {
        Self { tx }
    }

    /// Queues `envelope` without waiting. Delivery failures are not reported.
    pub fn send(&self, envelope: Envelope) {
        if let Err(e) = self.tx.send(envelope) {
            debug!("Dropping outbound {} message: writer has stopped", e.0.message_type);
        }
    }
}

pub struct SessionReceiver {
    stream: SplitStream<WsStream>,
}

impl SessionReceiver {
    /// Waits for the next binary frame and decodes it as an envelope.
    ///
    /// Control and text frames are skipped. A closed socket yields
    /// `Disconnected`; any other transport error yields `Receive`.
    pub async fn receive(&mut self) -> Result<Envelope, ClientError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Binary(bytes))) => return Ok(Envelope::from_bytes(&bytes)?),
                Some(Ok(Message::Close(frame))) => {
                    debug!("Server sent close frame: {:?}", frame);
                    return Err(ClientError::Disconnected);
                }
                Some(Ok(other)) => {
                    debug!("Skipping non-binary frame ({} bytes)", other.len());
                }
                Some(Err(
                    tungstenite::Error::ConnectionClosed
                    | tungstenite::Error::AlreadyClosed
                    | tungstenite::Error::Io(_),
                )) => return Err(ClientError::Disconnected),
                Some(Err(e)) => return Err(ClientError::Receive(e)),
                None => return Err(ClientError::Disconnected),
            }
        }
    }
}
