//! Sink implementations
//!
//! Contains ConsoleSink, QueueSink, and StoreSink.

mod console;
mod queue;
mod store;

pub use self::console::ConsoleSink;
pub use self::queue::QueueSink;
pub use self::store::{StoreSink, derive_key};
