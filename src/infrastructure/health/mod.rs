//! Health infrastructure - probe implementations and the status aggregator

mod aggregator;
mod probes;

pub use aggregator::{HealthAggregator, NOT_CHECKED_MESSAGE};
pub use probes::{HttpOrchestratorProbe, LlmProviderProbe, LocalOrchestratorProbe, StorageProbe};
