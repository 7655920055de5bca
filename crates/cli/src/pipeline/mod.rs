//! Pipeline orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{RelayOptions, RelayPipeline};
pub use stats::RelayStats;
