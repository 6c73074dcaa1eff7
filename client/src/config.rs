use clap::ValueEnum;

pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8080";

/// What to do with a `PlayerConnected` for an id that already has an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum JoinPolicy {
    /// Always create a new entity, even if the id is already present.
    #[default]
    Duplicate,
    /// Keep one entity per id; a repeated join only refreshes its position.
    Idempotent,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub join_policy: JoinPolicy,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            join_policy: JoinPolicy::default(),
        }
    }

    pub fn with_join_policy(mut self, join_policy: JoinPolicy) -> Self {
        self.join_policy = join_policy;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, "ws://127.0.0.1:8080");
        assert_eq!(config.join_policy, JoinPolicy::Duplicate);
    }

    #[test]
    fn test_join_policy_from_cli_value() {
        assert_eq!(
            JoinPolicy::from_str("idempotent", true),
            Ok(JoinPolicy::Idempotent)
        );
        assert!(JoinPolicy::from_str("bogus", true).is_err());
    }
}
