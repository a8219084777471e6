use crate::error::RelayError;
use crate::event::CloudEvent;

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub topic: String,
    /// Decimal form of the offset assigned by the topic log.
    pub message_id: String,
}

impl SendResult {
    pub fn new(topic: impl Into<String>, offset: u64) -> Self {
        Self {
            topic: topic.into(),
            message_id: offset.to_string(),
        }
    }
}

impl std::fmt::Display for SendResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.topic, self.message_id)
    }
}

/// Failure report handed to [`SendCallback::on_exception`].
#[derive(Debug)]
pub struct OnExceptionContext {
    /// Id of the source event, not a broker offset.
    pub message_id: String,
    pub topic: String,
    pub exception: RelayError,
}

/// Completion callback for callback-shaped publish calls.
///
/// Exactly one of the two methods fires, exactly once, per call.
pub trait SendCallback: Send + Sync {
    fn on_success(&self, result: SendResult);

    fn on_exception(&self, context: OnExceptionContext);
}

/// Callback for request/reply exchanges.
pub trait RequestReplyCallback: Send + Sync {
    fn on_success(&self, reply: CloudEvent);

    fn on_exception(&self, error: RelayError);
}
