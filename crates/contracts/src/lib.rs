//! # Contracts
//!
//! Frozen interface contracts shared by every relay crate: records, batches,
//! sink identifiers, per-sink configuration and the `RecordSink` trait.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data Model
//! - A `Record` is one dataset row: ordered `field -> FieldValue` pairs
//! - A `Batch` is the bounded, ordered set of records produced in one run
//! - Exactly one sink consumes a batch, exactly once

mod error;
mod record;
mod settings;
mod sink;
mod sink_kind;

pub use error::*;
pub use record::*;
pub use settings::*;
pub use sink::*;
pub use sink_kind::SinkKind;
