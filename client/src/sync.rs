//! Synchronization engine shared by the input path and the network path
//!
//! The host drives [`SyncEngine::tick`] once per frame with the sampled
//! controls: each active control transforms the local ship and is sent as its
//! own `UpdatePosition`. Independently, [`SyncEngine::run_inbound`] runs on a
//! tokio task and applies whatever the server sends. Both paths, and the
//! renderer through [`SyncEngine::snapshot`], go through one `RwLock` around
//! the entity store. Updates are last-writer-wins with no ordering check, so a
//! server echo of the local player's id overwrites local movement.

use crate::config::JoinPolicy;
use crate::entity::{EntitySnapshot, EntityStore, EntityTable};
use crate::error::ClientError;
use crate::session::{SessionReceiver, SessionSender};
use log::{debug, info, warn};
use shared::{
    Envelope, InputState, Message, MessageType, PlayerId, PositionData, UpdatePosition,
};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// What an inbound message did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// An existing entity's position was overwritten.
    Applied,
    /// A new entity was created.
    Created,
    /// Position update for an id with no entity; dropped.
    UnknownPlayer,
    /// Unrecognized tag, or a handshake arriving after bootstrap.
    Ignored,
}

pub struct SyncEngine<S = EntityTable> {
    local_id: PlayerId,
    table: Arc<RwLock<S>>,
    outgoing: SessionSender,
    join_policy: JoinPolicy,
}

impl<S> Clone for SyncEngine<S> {
    fn clone(&self) -> Self {
        Self {
            local_id: self.local_id,
            table: Arc::clone(&self.table),
            outgoing: self.outgoing.clone(),
            join_policy: self.join_policy,
        }
    }
}

impl<S: EntityStore> SyncEngine<S> {
    pub fn new(
        local_id: PlayerId,
        store: S,
        outgoing: SessionSender,
        join_policy: JoinPolicy,
    ) -> Self {
        Self {
            local_id,
            table: Arc::new(RwLock::new(store)),
            outgoing,
            join_policy,
        }
    }

    pub fn local_id(&self) -> PlayerId {
        self.local_id
    }

    // Every write is a single record assignment, so a poisoned table is still
    // consistent.
    fn read(&self) -> RwLockReadGuard<'_, S> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, S> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn entity_count(&self) -> usize {
        self.read().len()
    }

    pub fn position_of(&self, id: PlayerId) -> Option<PositionData> {
        let table = self.read();
        table.find(id).and_then(|handle| table.position(handle))
    }

    /// Copy of every entity for the renderer.
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.read().snapshot()
    }

    /// Applies one frame of local input and returns how many updates were
    /// sent.
    ///
    /// Controls are applied in the order forward, rotate-left, rotate-right.
    /// Every active control sends its own message carrying the position right
    /// after that transform.
    pub fn tick(&self, input: &InputState) -> usize {
        if input.is_idle() {
            return 0;
        }

        let updates = {
            let mut table = self.write();
            let Some(handle) = table.find(self.local_id) else {
                warn!("No entity for local player {}", self.local_id);
                return 0;
            };
            let Some(mut position) = table.position(handle) else {
                return 0;
            };

            let controls: [(bool, fn(&mut PositionData)); 3] = [
                (input.forward, PositionData::forward),
                (input.rotate_left, PositionData::rotate_left),
                (input.rotate_right, PositionData::rotate_right),
            ];

            let mut updates = Vec::with_capacity(controls.len());
            for (active, transform) in controls {
                if active {
                    transform(&mut position);
                    table.set_position(handle, position);
                    updates.push(position);
                }
            }
            updates
        };

        for position in &updates {
            let update = UpdatePosition {
                player_id: self.local_id,
                position: *position,
            };
            match Envelope::wrap(MessageType::UpdatePosition, &update) {
                Ok(envelope) => self.outgoing.send(envelope),
                Err(e) => warn!("Failed to encode position update: {}", e),
            }
        }

        updates.len()
    }

    /// Decodes one inbound envelope and applies it.
    ///
    /// Unrecognized tags are ignored. A recognized tag whose payload does not
    /// decode returns `MalformedPayload` and leaves the table untouched.
    pub fn handle_envelope(&self, envelope: &Envelope) -> Result<Dispatch, ClientError> {
        match Message::from_envelope(envelope)? {
            Some(message) => Ok(self.apply(message)),
            None => {
                debug!("Ignoring unrecognized message type {}", envelope.message_type);
                Ok(Dispatch::Ignored)
            }
        }
    }

    fn apply(&self, message: Message) -> Dispatch {
        match message {
            Message::UpdatePosition(update) => {
                let mut table = self.write();
                match table.find(update.player_id) {
                    Some(handle) => {
                        table.set_position(handle, update.position);
                        Dispatch::Applied
                    }
                    None => {
                        debug!("Dropping update for unknown player {}", update.player_id);
                        Dispatch::UnknownPlayer
                    }
                }
            }

            Message::PlayerConnected(joined) => {
                let mut table = self.write();
                if self.join_policy == JoinPolicy::Idempotent {
                    if let Some(handle) = table.find(joined.player_id) {
                        table.set_position(handle, joined.position);
                        debug!("Player {} rejoined, position refreshed", joined.player_id);
                        return Dispatch::Applied;
                    }
                }
                table.create_entity(joined.player_id, joined.position);
                info!("Player {} connected", joined.player_id);
                Dispatch::Created
            }

            Message::EstablishConnection(establish) => {
                warn!(
                    "Ignoring handshake for player {} after bootstrap",
                    establish.player_id
                );
                Dispatch::Ignored
            }
        }
    }
}

impl<S: EntityStore + Send + Sync + 'static> SyncEngine<S> {
    /// Receives and applies server messages until the connection closes.
    ///
    /// Receive errors and malformed payloads cost only the message at hand.
    pub async fn run_inbound(self, mut receiver: SessionReceiver) {
        loop {
            let envelope = match receiver.receive().await {
                Ok(envelope) => envelope,
                Err(ClientError::Disconnected) => {
                    warn!("Server closed the connection, inbound sync stopped");
                    break;
                }
                Err(e) => {
                    warn!("Skipping inbound message: {}", e);
                    continue;
                }
            };

            match self.handle_envelope(&envelope) {
                Ok(dispatch) => debug!("{} -> {:?}", envelope.message_type, dispatch),
                Err(e) => warn!("Dropping {} message: {}", envelope.message_type, e),
            }
        }
    }
}
