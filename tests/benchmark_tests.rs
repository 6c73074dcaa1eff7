//! Performance benchmarks for the hot paths of the sync protocol

use client::entity::{EntityStore, EntityTable};
use client::session::SessionSender;
use client::{JoinPolicy, SyncEngine};
use shared::{
    Envelope, EstablishConnection, InputState, Message, PlayerId, PositionData, RemotePlayer,
    UpdatePosition,
};
use std::time::Instant;
use tokio::sync::mpsc;

/// Benchmarks framing and unframing a position update
#[test]
fn benchmark_update_codec() {
    let message = Message::UpdatePosition(UpdatePosition {
        player_id: PlayerId(3),
        position: PositionData::new(120.0, 340.0, 1.25),
    });

    let iterations = 100_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let bytes = message.to_envelope().unwrap().to_bytes().unwrap();
        let envelope = Envelope::from_bytes(&bytes).unwrap();
        let _ = Message::from_envelope(&envelope).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Update codec: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds even in debug builds
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks decoding a large handshake roster
#[test]
fn benchmark_handshake_decode() {
    let message = Message::EstablishConnection(EstablishConnection {
        player_id: PlayerId(1),
        position: PositionData::default(),
        players: (2..=256)
            .map(|id| RemotePlayer {
                player_id: PlayerId(id),
                position: PositionData::new(id as f64, id as f64, 0.0),
            })
            .collect(),
    });
    let envelope = message.to_envelope().unwrap();

    let iterations = 5_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let decoded = Message::from_envelope(&envelope).unwrap();
        assert!(decoded.is_some());
    }

    let duration = start.elapsed();
    println!(
        "Handshake decode (255 players): {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 2000);
}

/// Benchmarks linear lookups in a realistic roster
#[test]
fn benchmark_table_lookup() {
    let mut table = EntityTable::new();
    for id in 0..64 {
        table.create_entity(PlayerId(id), PositionData::default());
    }

    let iterations = 100_000u32;
    let start = Instant::now();

    for i in 0..iterations {
        let handle = table.find(PlayerId(i % 64)).unwrap();
        table.set_position(handle, PositionData::new(i as f64, 0.0, 0.0));
    }

    let duration = start.elapsed();
    println!(
        "Table lookup (64 players): {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks a full outbound tick with every control held
#[test]
fn benchmark_outbound_tick() {
    let mut table = EntityTable::new();
    table.create_entity(PlayerId(1), PositionData::default());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine = SyncEngine::new(
        PlayerId(1),
        table,
        SessionSender::new(tx),
        JoinPolicy::Duplicate,
    );
    let input = InputState {
        forward: true,
        rotate_left: true,
        rotate_right: true,
    };

    let iterations = 20_000;
    let start = Instant::now();

    for _ in 0..iterations {
        engine.tick(&input);
        while rx.try_recv().is_ok() {}
    }

    let duration = start.elapsed();
    println!(
        "Outbound tick: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 2000);
}
