use shared::CodecError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Client-side failures.
///
/// `ConnectionFailed` and `HandshakeFailed` are fatal: the client has no world
/// to show without them. `Receive` and `MalformedPayload` only cost the message
/// at hand. `Disconnected` ends the inbound loop.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {url}: {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    #[error("handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("receive error: {0}")]
    Receive(#[from] tungstenite::Error),

    #[error(transparent)]
    MalformedPayload(#[from] CodecError),

    #[error("connection closed by server")]
    Disconnected,
}

impl ClientError {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClientError::ConnectionFailed { .. } | ClientError::HandshakeFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ClientError::HandshakeFailed("missing".to_string()).is_fatal());
        assert!(!ClientError::Disconnected.is_fatal());

        let malformed: Result<shared::PlayerId, _> = shared::decode(&[]);
        let error = ClientError::from(malformed.unwrap_err());
        assert!(!error.is_fatal());
        assert!(error.to_string().starts_with("malformed payload"));
    }
}
