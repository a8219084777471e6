#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("topic name must not be empty")]
    EmptyTopic,

    #[error("payload of {size} bytes exceeds the {limit} byte limit of topic '{topic}'")]
    PayloadTooLarge {
        topic: String,
        size: usize,
        limit: usize,
    },

    #[error("cannot create topic '{topic}': broker already holds {limit} topics")]
    TopicLimitExceeded { topic: String, limit: usize },

    #[error("config error: {0}")]
    Config(String),
}
