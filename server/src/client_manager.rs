//! Roster of connected peers for the relay server
//!
//! This module tracks who is connected and where their ship was last seen:
//! - Player id assignment and deterministic spawn positions
//! - The `EstablishConnection` snapshot handed to each newcomer
//! - Fan-out of envelopes to every peer except the originator
//!
//! Peers are kept in a `BTreeMap` so that snapshots and broadcasts always walk
//! the roster in id order.

use log::{debug, info};
use shared::{
    Envelope, EstablishConnection, PlayerId, PositionData, RemotePlayer, WORLD_HEIGHT, WORLD_WIDTH,
};
use std::collections::BTreeMap;
use tokio::sync::mpsc;

/// A connected peer and the channel feeding its socket writer.
#[derive(Debug)]
pub struct Peer {
    /// Identifier assigned by the server
    pub id: PlayerId,
    /// Last position reported by the peer, or its spawn point
    pub position: PositionData,
    /// Outbound queue drained by the connection's writer task
    pub sender: mpsc::UnboundedSender<Envelope>,
}

/// Manages all connected peers.
///
/// Ids start at 1 and are never reused within one server run.
pub struct ClientManager {
    peers: BTreeMap<PlayerId, Peer>,
    next_client_id: u32,
    max_clients: usize,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            peers: BTreeMap::new(),
            next_client_id: 1,
            max_clients,
        }
    }

    /// Registers a new peer.
    ///
    /// Returns the assigned id and the handshake describing the newcomer and
    /// everyone already present, or `None` when the server is full.
    pub fn add_client(
        &mut self,
        sender: mpsc::UnboundedSender<Envelope>,
    ) -> Option<(PlayerId, EstablishConnection)> {
        if self.peers.len() >= self.max_clients {
            return None;
        }

        let id = PlayerId(self.next_client_id);
        self.next_client_id += 1;

        let position = spawn_position(id);
        let establish = EstablishConnection {
            player_id: id,
            position,
            players: self
                .peers
                .values()
                .map(|peer| RemotePlayer {
                    player_id: peer.id,
                    position: peer.position,
                })
                .collect(),
        };

        info!(
            "Player {} connected at ({:.1}, {:.1})",
            id, position.x, position.y
        );
        self.peers.insert(
            id,
            Peer {
                id,
                position,
                sender,
            },
        );

        Some((id, establish))
    }

    pub fn remove_client(&mut self, id: PlayerId) -> Option<Peer> {
        let removed = self.peers.remove(&id);
        if removed.is_some() {
            info!("Player {} disconnected", id);
        }
        removed
    }

    /// Records the latest position for `id`. Returns false for unknown ids.
    pub fn update_position(&mut self, id: PlayerId, position: PositionData) -> bool {
        match self.peers.get_mut(&id) {
            Some(peer) => {
                peer.position = position;
                true
            }
            None => false,
        }
    }

    pub fn send_to(&self, id: PlayerId, envelope: Envelope) {
        if let Some(peer) = self.peers.get(&id) {
            if peer.sender.send(envelope).is_err() {
                debug!("Writer for player {} has stopped", id);
            }
        }
    }

    /// Queues `envelope` for every peer except `exclude`. Returns the number
    /// of peers it was queued for.
    pub fn broadcast(&self, envelope: &Envelope, exclude: Option<PlayerId>) -> usize {
        let mut delivered = 0;
        for peer in self.peers.values() {
            if Some(peer.id) == exclude {
                continue;
            }
            if peer.sender.send(envelope.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!("Writer for player {} has stopped", peer.id);
            }
        }
        delivered
    }

    pub fn position_of(&self, id: PlayerId) -> Option<PositionData> {
        self.peers.get(&id).map(|peer| peer.position)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }
}

/// Spreads spawn points across the world so consecutive ids do not overlap.
pub fn spawn_position(id: PlayerId) -> PositionData {
    let margin = 100.0;
    let x = margin + (id.0 as f64 * 120.0) % (WORLD_WIDTH - 2.0 * margin);
    let y = margin + (id.0 as f64 * 70.0) % (WORLD_HEIGHT - 2.0 * margin);
    PositionData::new(x, y, 0.0)
}
