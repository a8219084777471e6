use std::sync::Arc;
use std::time::Duration;

use relay_api::{
    CloudEvent, OnExceptionContext, RelayError, RequestReplyCallback, SendCallback, SendResult,
};
use relay_store::Broker;

use crate::config::ProducerConfig;
use crate::state::{AtomicProducerState, ProducerState};

/// Publishes events into a [`Broker`].
///
/// The broker is shared, not owned: any number of producers may publish into
/// the same instance concurrently. The lifecycle flag is private to each
/// producer and does not gate publishing.
#[derive(Debug)]
pub struct Producer {
    broker: Arc<Broker>,
    config: ProducerConfig,
    state: AtomicProducerState,
}

impl Producer {
    pub fn new(broker: Arc<Broker>, config: ProducerConfig) -> Self {
        Self {
            broker,
            config,
            state: AtomicProducerState::new(ProducerState::NotStarted),
        }
    }

    /// Producer bound to the process-wide [`Broker::shared`] instance.
    pub fn standalone(config: ProducerConfig) -> Self {
        Self::new(Broker::shared(), config)
    }

    /// Fresh, not started producer on the same broker. `self` is left as is.
    pub fn init(&self, config: ProducerConfig) -> Producer {
        Producer::new(self.broker.clone(), config)
    }

    pub fn broker(&self) -> &Arc<Broker> {
        &self.broker
    }

    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    // ---------------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------------

    pub fn start(&self) {
        if self.state.transition(ProducerState::NotStarted, ProducerState::Started) {
            tracing::debug!(group = %self.config.group, "producer started");
        }
    }

    pub fn shutdown(&self) {
        if self.state.transition(ProducerState::Started, ProducerState::NotStarted) {
            tracing::debug!(group = %self.config.group, "producer shut down");
        }
    }

    pub fn state(&self) -> ProducerState {
        self.state.get()
    }

    pub fn is_started(&self) -> bool {
        self.state() == ProducerState::Started
    }

    pub fn is_closed(&self) -> bool {
        !self.is_started()
    }

    // ---------------------------------------------------------------------------
    // Publish paths
    // ---------------------------------------------------------------------------

    /// Append `event` to the topic named by its subject.
    ///
    /// The returned message id is the decimal offset the log assigned.
    pub fn publish(&self, event: &CloudEvent) -> Result<SendResult, RelayError> {
        event.validate()?;
        self.put(event)
    }

    /// Publish and report the outcome through `callback` before returning.
    ///
    /// Only an invalid event is returned as `Err`; in that case no callback
    /// fires. Otherwise exactly one of `on_success`/`on_exception` fires once.
    pub fn publish_with_callback(
        &self,
        event: &CloudEvent,
        callback: &dyn SendCallback,
    ) -> Result<(), RelayError> {
        event.validate()?;
        match self.put(event) {
            Ok(result) => callback.on_success(result),
            Err(exception) => callback.on_exception(OnExceptionContext {
                message_id: event.id.clone(),
                topic: event.subject().to_string(),
                exception,
            }),
        }
        Ok(())
    }

    /// Same as [`publish`](Self::publish) with the result dropped. Failures
    /// are still returned.
    pub fn send_oneway(&self, event: &CloudEvent) -> Result<(), RelayError> {
        self.publish(event).map(drop)
    }

    /// Callback-shaped publish. The work runs inline on the caller's thread,
    /// the callback fires before this returns.
    pub fn send_async(
        &self,
        event: &CloudEvent,
        callback: &dyn SendCallback,
    ) -> Result<(), RelayError> {
        self.publish_with_callback(event, callback)
    }

    pub fn request(
        &self,
        _event: &CloudEvent,
        _callback: &dyn RequestReplyCallback,
        _timeout: Duration,
    ) -> Result<(), RelayError> {
        Err(RelayError::UnsupportedOperation("request"))
    }

    pub fn reply(
        &self,
        _event: &CloudEvent,
        _callback: &dyn SendCallback,
    ) -> Result<bool, RelayError> {
        Err(RelayError::UnsupportedOperation("reply"))
    }

    /// Turn an absent topic into [`RelayError::TopicNotFound`].
    pub fn check_topic_exist(&self, topic: &str) -> Result<(), RelayError> {
        if self.broker.check_topic_exist(topic) {
            Ok(())
        } else {
            Err(RelayError::TopicNotFound(topic.to_string()))
        }
    }

    fn put(&self, event: &CloudEvent) -> Result<SendResult, RelayError> {
        let topic = event.subject();
        match self.broker.put_message(topic, event) {
            Ok(entry) => Ok(SendResult::new(topic, entry.offset())),
            Err(e) => {
                tracing::error!(topic = %topic, event_id = %event.id, error = %e, "send message error");
                Err(RelayError::storage(topic, e))
            }
        }
    }
}
