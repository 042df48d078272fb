//! Probe traits for the three system dependencies

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// A probe could not reach its target
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConnectivityError {
    #[error("{target} unreachable: {message}")]
    Unreachable { target: String, message: String },

    #[error("{target} did not answer within {timeout_ms}ms")]
    Timeout { target: String, timeout_ms: u64 },

    /// The dependency cannot be checked because it is not set up
    #[error("{message}")]
    NotConfigured { target: String, message: String },
}

impl ConnectivityError {
    pub fn unreachable(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unreachable {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn timeout(target: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            target: target.into(),
            timeout_ms,
        }
    }

    pub fn not_configured(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotConfigured {
            target: target.into(),
            message: message.into(),
        }
    }

    /// The dependency this error refers to
    pub fn target(&self) -> &str {
        match self {
            Self::Unreachable { target, .. }
            | Self::Timeout { target, .. }
            | Self::NotConfigured { target, .. } => target,
        }
    }
}

/// Reachability of the orchestration API. Gates every other probe.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OrchestratorProbe: Send + Sync {
    async fn ping(&self) -> Result<(), ConnectivityError>;
}

/// Reachability of a dependency behind the orchestrator (store, LLM provider).
///
/// On success returns a short human-readable detail, e.g. the backend or model name.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ServiceProbe: Send + Sync {
    async fn check(&self) -> Result<String, ConnectivityError>;
}
