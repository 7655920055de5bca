//! RecordSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{Batch, ContractError};

/// Record output trait
///
/// All sink implementations must implement this trait.
/// A sink instance emits at most one batch and is released exactly once.
#[trait_variant::make(RecordSink: Send)]
pub trait LocalRecordSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Emit every record of the batch, in order
    ///
    /// Per-record transport failures are counted in the report, never
    /// returned as `Err`.
    ///
    /// # Errors
    /// Whole-sink failures only (second emit, closed output)
    async fn emit(&mut self, batch: &Batch) -> Result<EmitReport, ContractError>;

    /// Release held resources (flush pending writes, close connections)
    ///
    /// Transport failures are logged, never propagated. Idempotent.
    async fn release(&mut self);
}

/// Outcome of one `emit` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Records the sink tried to deliver
    pub attempted: usize,
    /// Records confirmed delivered (or written, for console)
    pub delivered: usize,
    /// Records skipped after a transport/serialization failure
    pub failed: usize,
    /// Round trips used to flush pipelined writes
    pub flushes: usize,
}

impl EmitReport {
    /// Whether every attempted record was delivered
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.delivered == self.attempted
    }
}
