use serde::Deserialize;

use crate::error::BrokerError;

fn default_max_messages_per_topic() -> usize {
    2048
}

fn default_max_payload_bytes() -> usize {
    4 * 1024 * 1024
}

/// Broker limits, usually read from the `[broker]` table of the TOML config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrokerConfig {
    /// Entries retained per topic. The oldest entry is evicted once full.
    #[serde(default = "default_max_messages_per_topic")]
    pub max_messages_per_topic: usize,

    /// Upper bound for the data section of a single event.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,

    /// Upper bound for the number of topics. `None` = unlimited.
    #[serde(default)]
    pub max_topics: Option<usize>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            max_messages_per_topic: default_max_messages_per_topic(),
            max_payload_bytes: default_max_payload_bytes(),
            max_topics: None,
        }
    }
}

impl BrokerConfig {
    pub fn validate(&self) -> Result<(), BrokerError> {
        if self.max_messages_per_topic == 0 {
            return Err(BrokerError::Config(
                "max_messages_per_topic must be greater than 0".into(),
            ));
        }
        if self.max_payload_bytes == 0 {
            return Err(BrokerError::Config(
                "max_payload_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BrokerConfig::default();
        assert_eq!(config.max_messages_per_topic, 2048);
        assert_eq!(config.max_payload_bytes, 4 * 1024 * 1024);
        assert_eq!(config.max_topics, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_limits_rejected() {
        let config = BrokerConfig {
            max_messages_per_topic: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BrokerError::Config(_))));

        let config = BrokerConfig {
            max_payload_bytes: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BrokerError::Config(_))));
    }
}
