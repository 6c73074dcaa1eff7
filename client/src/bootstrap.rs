//! One-time handshake: identity assignment and initial world snapshot

use crate::config::ClientConfig;
use crate::entity::{EntityStore, EntityTable};
use crate::error::ClientError;
use crate::session::{Session, SessionReceiver};
use crate::sync::SyncEngine;
use log::info;
use shared::{EstablishConnection, Message, MessageType};

/// Connects, waits for `EstablishConnection` and seeds a fresh table.
///
/// Every failure here is fatal to the caller. On success the returned engine
/// is ready to tick and the receiver is ready for
/// [`SyncEngine::run_inbound`].
pub async fn bootstrap(
    config: &ClientConfig,
) -> Result<(SyncEngine<EntityTable>, SessionReceiver), ClientError> {
    let mut session = Session::connect(&config.server_url).await?;

    let establish = await_establish(session.receiver()).await?;
    info!(
        "Assigned player {} with {} remote player(s) already connected",
        establish.player_id,
        establish.players.len()
    );

    let mut table = EntityTable::new();
    seed(&establish, &mut table);

    let (sender, receiver) = session.split();
    let engine = SyncEngine::new(establish.player_id, table, sender, config.join_policy);
    Ok((engine, receiver))
}

/// Reads exactly one envelope and requires it to be `EstablishConnection`.
pub async fn await_establish(
    receiver: &mut SessionReceiver,
) -> Result<EstablishConnection, ClientError> {
    let envelope = receiver
        .receive()
        .await
        .map_err(|e| ClientError::HandshakeFailed(format!("no initial message: {}", e)))?;

    match Message::from_envelope(&envelope) {
        Ok(Some(Message::EstablishConnection(establish))) => Ok(establish),
        Ok(_) => Err(ClientError::HandshakeFailed(format!(
            "expected {}, got {}",
            MessageType::EstablishConnection.tag(),
            envelope.message_type
        ))),
        Err(e) => Err(ClientError::HandshakeFailed(e.to_string())),
    }
}

/// Creates the local entity first, then one entity per roster entry in the
/// order received.
pub fn seed<S: EntityStore>(establish: &EstablishConnection, store: &mut S) {
    store.create_entity(establish.player_id, establish.position);
    for remote in &establish.players {
        store.create_entity(remote.player_id, remote.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{PlayerId, PositionData, RemotePlayer};

    fn establish_with(remote_count: u32) -> EstablishConnection {
        EstablishConnection {
            player_id: PlayerId(100),
            position: PositionData::new(1.0, 2.0, 0.5),
            players: (1..=remote_count)
                .map(|i| RemotePlayer {
                    player_id: PlayerId(i),
                    position: PositionData::new(i as f64 * 10.0, i as f64, -(i as f64)),
                })
                .collect(),
        }
    }

    #[test]
    fn test_seed_creates_local_plus_roster() {
        for remote_count in [0, 1, 5, 32] {
            let establish = establish_with(remote_count);
            let mut table = EntityTable::new();
            seed(&establish, &mut table);

            assert_eq!(table.len(), remote_count as usize + 1);

            let local = table.find(PlayerId(100)).unwrap();
            assert_eq!(table.position(local), Some(establish.position));

            for remote in &establish.players {
                let handle = table.find(remote.player_id).unwrap();
                assert_eq!(table.position(handle), Some(remote.position));
            }
        }
    }

    #[test]
    fn test_seed_keeps_received_order() {
        let establish = establish_with(3);
        let mut table = EntityTable::new();
        seed(&establish, &mut table);

        let ids: Vec<u32> = table.snapshot().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![100, 1, 2, 3]);
    }
}
