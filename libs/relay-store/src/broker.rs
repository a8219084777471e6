use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use relay_api::CloudEvent;

use crate::config::BrokerConfig;
use crate::error::BrokerError;
use crate::log::TopicLog;
use crate::message::MessageEntity;

static SHARED: OnceLock<Arc<Broker>> = OnceLock::new();

/// Snapshot of a topic log's bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicStats {
    pub topic: String,
    pub head_offset: u64,
    pub next_offset: u64,
    pub retained: usize,
}

/// Registry of topic logs.
///
/// A log is created lazily on the first write to an unseen topic and lives as
/// long as the broker. Query methods never create logs.
pub struct Broker {
    config: BrokerConfig,
    topics: RwLock<HashMap<String, Arc<TopicLog>>>,
}

impl std::fmt::Debug for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("config", &self.config)
            .field("topics", &self.topic_names())
            .finish()
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(BrokerConfig::default())
    }
}

impl Broker {
    pub fn new(config: BrokerConfig) -> Self {
        Self {
            config,
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Process-wide broker with default limits.
    ///
    /// The first caller constructs it; racing first callers all observe the
    /// same instance.
    pub fn shared() -> Arc<Broker> {
        SHARED
            .get_or_init(|| {
                tracing::info!("initializing shared broker");
                Arc::new(Broker::default())
            })
            .clone()
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    fn read_topics(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<TopicLog>>> {
        match self.topics.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("topic registry read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write_topics(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<TopicLog>>> {
        match self.topics.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("topic registry write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Append `event` to the log of `topic`, creating the log if needed.
    pub fn put_message(&self, topic: &str, event: &CloudEvent) -> Result<MessageEntity, BrokerError> {
        if topic.is_empty() {
            return Err(BrokerError::EmptyTopic);
        }
        let size = event.data_len();
        if size > self.config.max_payload_bytes {
            return Err(BrokerError::PayloadTooLarge {
                topic: topic.to_string(),
                size,
                limit: self.config.max_payload_bytes,
            });
        }

        let log = self.create_topic_if_absent(topic)?;
        Ok(log.append(event.clone()))
    }

    /// Look up the log of `topic`, registering an empty one if absent.
    pub fn create_topic_if_absent(&self, topic: &str) -> Result<Arc<TopicLog>, BrokerError> {
        if topic.is_empty() {
            return Err(BrokerError::EmptyTopic);
        }
        if let Some(log) = self.topic(topic) {
            return Ok(log);
        }

        let mut topics = self.write_topics();
        // Another writer may have won the race between the two locks.
        if let Some(log) = topics.get(topic) {
            return Ok(log.clone());
        }
        if let Some(limit) = self.config.max_topics {
            if topics.len() >= limit {
                return Err(BrokerError::TopicLimitExceeded {
                    topic: topic.to_string(),
                    limit,
                });
            }
        }

        let log = Arc::new(TopicLog::new(topic, self.config.max_messages_per_topic));
        topics.insert(topic.to_string(), log.clone());
        tracing::info!(
            topic = %topic,
            capacity = log.capacity(),
            "created topic log"
        );
        Ok(log)
    }

    pub fn check_topic_exist(&self, topic: &str) -> bool {
        self.read_topics().contains_key(topic)
    }

    pub fn topic(&self, topic: &str) -> Option<Arc<TopicLog>> {
        self.read_topics().get(topic).cloned()
    }

    /// Registered topic names, sorted.
    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_topics().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get_message(&self, topic: &str, offset: u64) -> Option<MessageEntity> {
        self.topic(topic)?.get(offset)
    }

    /// Oldest retained message of `topic`.
    pub fn head_message(&self, topic: &str) -> Option<MessageEntity> {
        self.topic(topic)?.first()
    }

    /// Newest message of `topic`.
    pub fn latest_message(&self, topic: &str) -> Option<MessageEntity> {
        self.topic(topic)?.last()
    }

    pub fn read_messages(&self, topic: &str, from_offset: u64, limit: usize) -> Vec<MessageEntity> {
        self.topic(topic)
            .map(|log| log.read(from_offset, limit))
            .unwrap_or_default()
    }

    pub fn topic_stats(&self, topic: &str) -> Option<TopicStats> {
        let log = self.topic(topic)?;
        // One snapshot per field is enough for reporting; appends may interleave.
        Some(TopicStats {
            topic: topic.to_string(),
            head_offset: log.head_offset(),
            next_offset: log.next_offset(),
            retained: log.len(),
        })
    }
}
