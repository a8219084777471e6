//! Producer side of the standalone broker.
//!
//! A [`Producer`] is bound to a shared [`relay_store::Broker`] at construction
//! and turns publish calls into broker writes. All publish variants run to
//! completion on the caller's thread, the callback-shaped ones included.

pub mod config;
pub mod producer;
pub mod state;

pub use config::ProducerConfig;
pub use producer::Producer;
pub use state::{AtomicProducerState, ProducerState};
