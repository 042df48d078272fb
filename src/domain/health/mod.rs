//! Health domain - dependency probes and the composite system status

mod probe;
mod status;

pub use probe::{ConnectivityError, OrchestratorProbe, ServiceProbe};
pub use status::{
    evaluate, ConnectionStatus, HealthStatus, ServiceHealth, SystemStatus, LLM_SERVICE,
    BACKEND_SERVICE, DATABASE_SERVICE,
};

#[cfg(test)]
pub use probe::{MockOrchestratorProbe, MockServiceProbe};
