//! In-memory storage engine of the standalone broker.
//!
//! A [`Broker`] maps topic names to [`TopicLog`]s. Each log is an append-only,
//! offset-indexed sequence of [`MessageEntity`] values with its own offset
//! counter starting at 0.

pub mod broker;
pub mod config;
pub mod error;
pub mod log;
pub mod message;

pub use broker::{Broker, TopicStats};
pub use config::BrokerConfig;
pub use error::BrokerError;
pub use log::TopicLog;
pub use message::MessageEntity;
