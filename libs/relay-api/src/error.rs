/// Error surface of the producer API.
///
/// Every failure is detected synchronously inside the call that triggers it.
/// Nothing here is retried by the library.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Rejected before any broker interaction.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Broker or log level failure, tagged with the topic it targeted.
    #[error("send message error, topic: {topic}: {source}")]
    Storage {
        topic: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("topic '{0}' does not exist")]
    TopicNotFound(String),

    #[error("{0} is not supported")]
    UnsupportedOperation(&'static str),
}

impl RelayError {
    /// Wrap a broker failure, tagging it with the topic.
    pub fn storage(
        topic: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        RelayError::Storage {
            topic: topic.into(),
            source: source.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        RelayError::InvalidArgument(msg.into())
    }

    /// Topic the error refers to, if any.
    pub fn topic(&self) -> Option<&str> {
        match self {
            RelayError::Storage { topic, .. } => Some(topic),
            RelayError::TopicNotFound(topic) => Some(topic),
            RelayError::InvalidArgument(_) | RelayError::UnsupportedOperation(_) => None,
        }
    }
}
