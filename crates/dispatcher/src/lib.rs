//! # Dispatcher
//!
//! 数据分发模块。
//!
//! 负责：
//! - 按标识符构建唯一的 sink（console / queue / store）
//! - 将一个 `Batch` 按顺序交给该 sink
//! - emit 之后总是释放 sink 持有的连接

pub mod dispatcher;
pub mod error;
pub mod factory;
pub mod metrics;
pub mod sinks;
pub mod transport;

pub use contracts::{Batch, EmitReport, RecordSink};
pub use dispatcher::{Dispatcher, create_dispatcher, dispatch};
pub use error::DispatcherError;
pub use factory::{Sink, SinkFactory};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{ConsoleSink, QueueSink, StoreSink, derive_key};
pub use transport::{KafkaPublisher, KeyValueClient, MessagePublisher, RedisClient};
