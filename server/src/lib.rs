//! # Relay Server Library
//!
//! Counterpart to the client library. The server is a relay, not an
//! authority: it hands out identities, tells newcomers who is already
//! present, and forwards position updates between peers. It never simulates
//! or validates movement.
//!
//! ## Core Responsibilities
//!
//! ### Identity and Bootstrap
//! Each accepted WebSocket peer gets the next `PlayerId` (starting at 1) and
//! a deterministic spawn point. Its first message is `EstablishConnection`
//! with its own position and the last known position of every other peer.
//!
//! ### Join Announcements
//! Every other peer receives `PlayerConnected` for the newcomer. Registration,
//! the handshake and the announcement all happen under one roster lock, so no
//! peer can miss or double-count a join.
//!
//! ### Update Relay
//! `UpdatePosition` from a peer is recorded in the roster and forwarded to
//! everyone else. It is not echoed back to the sender. Other tags and
//! malformed frames are logged and dropped.
//!
//! ### Departures
//! The protocol has no leave message. A peer that disconnects is removed from
//! the roster, so later newcomers no longer see it; existing peers keep
//! whatever they last received.
//!
//! ## Module Organization
//!
//! ### Client Manager Module (`client_manager`)
//! Roster of connected peers, id assignment, spawn points and fan-out.
//!
//! ### Network Module (`network`)
//! TCP accept loop, WebSocket handshake, and per-peer reader and writer
//! tasks.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Bind with room for 32 peers.
//!     let server = Server::bind("127.0.0.1:8080", 32).await?;
//!
//!     // Accept peers until the process exits.
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod network;
