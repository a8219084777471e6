use relay_api::CloudEvent;

/// One stored event. Immutable once the topic log has created it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEntity {
    topic: String,
    offset: u64,
    payload: CloudEvent,
    created_at_ms: i64,
}

impl MessageEntity {
    pub(crate) fn new(topic: String, offset: u64, payload: CloudEvent, created_at_ms: i64) -> Self {
        Self {
            topic,
            offset,
            payload,
            created_at_ms,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn payload(&self) -> &CloudEvent {
        &self.payload
    }

    /// Append time, Unix milliseconds.
    pub fn created_at_ms(&self) -> i64 {
        self.created_at_ms
    }

    pub fn into_payload(self) -> CloudEvent {
        self.payload
    }
}
