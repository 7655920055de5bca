//! Transport abstraction
//!
//! Defines the client seams used by the queue and store sinks, supporting the
//! real Kafka / Redis implementations and mock testing.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use contracts::ContractError;

pub mod kafka_publisher;
pub mod mock;
pub mod redis_client;

pub use self::kafka_publisher::KafkaPublisher;
pub use self::mock::{MockKeyValueClient, MockPublisher};
pub use self::redis_client::RedisClient;

/// Message broker client trait
///
/// One publish call is one message; the call completes when the broker has
/// acknowledged that message or the timeout elapsed.
pub trait MessagePublisher: Send {
    /// Publish a payload to `topic` and wait for its acknowledgment
    fn publish(
        &mut self,
        topic: &str,
        payload: Bytes,
        ack_timeout: Duration,
    ) -> impl Future<Output = Result<(), ContractError>> + Send;

    /// Deliver any buffered outbound messages
    fn flush(&mut self, timeout: Duration) -> impl Future<Output = Result<(), ContractError>> + Send;

    /// Close the broker connection
    ///
    /// Idempotent operation: returns Ok if already closed
    fn close(&mut self) -> impl Future<Output = Result<(), ContractError>> + Send;
}

/// Key-value store client trait
///
/// Writes are queued locally and sent as one pipelined round trip on `flush`.
pub trait KeyValueClient: Send {
    /// Queue a `SET key value` into the pending pipeline
    fn queue_set(&mut self, key: &str, value: &str) -> Result<(), ContractError>;

    /// Number of queued, unflushed writes
    fn pending(&self) -> usize;

    /// Send every queued write in one round trip
    ///
    /// # Returns
    /// Number of writes sent. The queue is empty afterwards, even on error.
    fn flush(&mut self) -> impl Future<Output = Result<usize, ContractError>> + Send;

    /// Close the store connection
    ///
    /// Idempotent operation: returns Ok if already closed
    fn close(&mut self) -> impl Future<Output = Result<(), ContractError>> + Send;
}
