//! Message envelope and the payload shapes carried inside it
//!
//! Every unit on the wire is an [`Envelope`]: a string tag plus an opaque
//! payload encoded with [`crate::codec`]. The tag is inspected first and only
//! then is the payload decoded into the matching shape. Tags this build does
//! not know are reported as `None` so that newer servers can add messages
//! without breaking older clients.

use crate::codec::{decode, encode, CodecError};
use crate::{PlayerId, PositionData};
use serde::{Deserialize, Serialize};

/// Tags understood by this protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    EstablishConnection,
    UpdatePosition,
    PlayerConnected,
}

impl MessageType {
    pub const fn tag(self) -> &'static str {
        match self {
            MessageType::EstablishConnection => "EstablishConnection",
            MessageType::UpdatePosition => "UpdatePosition",
            MessageType::PlayerConnected => "PlayerConnected",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "EstablishConnection" => Some(MessageType::EstablishConnection),
            "UpdatePosition" => Some(MessageType::UpdatePosition),
            "PlayerConnected" => Some(MessageType::PlayerConnected),
            _ => None,
        }
    }
}

/// A participant already present when a client joins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemotePlayer {
    pub player_id: PlayerId,
    pub position: PositionData,
}

/// Handshake sent once by the server: the new client's identity, its spawn
/// position and the current roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstablishConnection {
    pub player_id: PlayerId,
    pub position: PositionData,
    pub players: Vec<RemotePlayer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdatePosition {
    pub player_id: PlayerId,
    pub position: PositionData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerConnected {
    pub player_id: PlayerId,
    pub position: PositionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub message_type: String,
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Encodes `value` and stamps it with `message_type`.
    pub fn wrap<T: Serialize>(message_type: MessageType, value: &T) -> Result<Self, CodecError> {
        Ok(Self {
            message_type: message_type.tag().to_string(),
            payload: encode(value)?,
        })
    }

    pub fn unwrap(&self) -> (&str, &[u8]) {
        (&self.message_type, &self.payload)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        decode(bytes)
    }
}

/// Closed set of messages this protocol version understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    EstablishConnection(EstablishConnection),
    UpdatePosition(UpdatePosition),
    PlayerConnected(PlayerConnected),
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::EstablishConnection(_) => MessageType::EstablishConnection,
            Message::UpdatePosition(_) => MessageType::UpdatePosition,
            Message::PlayerConnected(_) => MessageType::PlayerConnected,
        }
    }

    pub fn to_envelope(&self) -> Result<Envelope, CodecError> {
        match self {
            Message::EstablishConnection(payload) => {
                Envelope::wrap(MessageType::EstablishConnection, payload)
            }
            Message::UpdatePosition(payload) => Envelope::wrap(MessageType::UpdatePosition, payload),
            Message::PlayerConnected(payload) => {
                Envelope::wrap(MessageType::PlayerConnected, payload)
            }
        }
    }

    /// Decodes the payload according to the tag.
    ///
    /// Returns `Ok(None)` for tags outside [`MessageType`]; these are meant to
    /// be skipped, not treated as errors.
    pub fn from_envelope(envelope: &Envelope) -> Result<Option<Self>, CodecError> {
        let (tag, payload) = envelope.unwrap();
        let message = match MessageType::from_tag(tag) {
            Some(MessageType::EstablishConnection) => {
                Message::EstablishConnection(decode(payload)?)
            }
            Some(MessageType::UpdatePosition) => Message::UpdatePosition(decode(payload)?),
            Some(MessageType::PlayerConnected) => Message::PlayerConnected(decode(payload)?),
            None => return Ok(None),
        };
        Ok(Some(message))
    }
}
