pub mod error;
pub mod event;
pub mod send;
pub mod util;

pub use error::RelayError;
pub use event::CloudEvent;
pub use send::{OnExceptionContext, RequestReplyCallback, SendCallback, SendResult};
pub use util::now_ms;
