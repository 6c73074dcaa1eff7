//! # Game Client Library
//!
//! Client half of a best-effort entity synchronization protocol. A client
//! holds one WebSocket connection to the server, learns its identity and the
//! current roster during a one-time handshake, and from then on keeps every
//! ship's position in sync in both directions.
//!
//! ## Architecture Overview
//!
//! ### Bootstrap
//! [`bootstrap::bootstrap`] dials the server and blocks on the first message,
//! which must be `EstablishConnection`. It carries the local player id, the
//! local spawn position and every participant already connected. The entity
//! table is seeded from it before anything else runs. Any failure here is
//! fatal.
//!
//! ### Outbound Path
//! The host samples the keyboard every frame and calls
//! [`sync::SyncEngine::tick`]. Each held control transforms the local ship
//! and immediately sends an `UpdatePosition` carrying the result. Sending
//! never blocks the frame: envelopes are queued for the session's writer task.
//!
//! ### Inbound Path
//! [`sync::SyncEngine::run_inbound`] runs on its own tokio task and applies
//! `UpdatePosition` and `PlayerConnected` messages to the same table. Updates
//! are last-writer-wins. Unknown tags and undecodable payloads are skipped
//! without touching the connection.
//!
//! ## Module Organization
//!
//! - `bootstrap`: handshake and initial table seeding
//! - `config`: client configuration and the duplicate-join policy
//! - `entity`: the entity store trait and its Vec-backed table
//! - `error`: client error taxonomy
//! - `input`: keyboard sampling (macroquad)
//! - `rendering`: ship drawing (macroquad)
//! - `session`: the WebSocket connection and its send/receive halves
//! - `sync`: the synchronization engine
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::bootstrap::bootstrap;
//! use client::config::ClientConfig;
//! use shared::InputState;
//!
//! # async fn run() -> Result<(), client::error::ClientError> {
//! let config = ClientConfig::new("ws://127.0.0.1:8080");
//! let (engine, receiver) = bootstrap(&config).await?;
//!
//! tokio::spawn(engine.clone().run_inbound(receiver));
//!
//! // Once per frame:
//! engine.tick(&InputState { forward: true, ..InputState::default() });
//! let ships = engine.snapshot();
//! # let _ = ships;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod entity;
pub mod error;
pub mod input;
pub mod rendering;
pub mod session;
pub mod sync;

pub use config::{ClientConfig, JoinPolicy};
pub use error::ClientError;
pub use sync::{Dispatch, SyncEngine};
