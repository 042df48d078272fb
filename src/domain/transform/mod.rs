//! Step transformation - the external capability each workflow step delegates to

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::workflow::StepKind;

/// Failure of a single transformation call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransformError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("transformer returned empty output")]
    EmptyOutput,
}

impl TransformError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }
}

/// Performs one text transformation for a step kind
#[async_trait]
pub trait StepTransformer: Send + Sync + std::fmt::Debug {
    async fn transform(&self, kind: StepKind, text: &str) -> Result<String, TransformError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Deterministic transformer for tests.
    ///
    /// Output is `"<kind>(<input>)"`, so chaining is visible in the final text. Every
    /// call is recorded in order.
    #[derive(Debug, Default)]
    pub struct ScriptedTransformer {
        calls: Mutex<Vec<(StepKind, String)>>,
        failures: HashMap<usize, TransformError>,
        outputs: HashMap<usize, String>,
        delay: Option<Duration>,
    }

    impl ScriptedTransformer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail the call with this zero-based index
        pub fn failing_at(mut self, call: usize, error: TransformError) -> Self {
            self.failures.insert(call, error);
            self
        }

        /// Return a fixed output for the call with this zero-based index
        pub fn with_output_at(mut self, call: usize, output: impl Into<String>) -> Self {
            self.outputs.insert(call, output.into());
            self
        }

        /// Sleep before answering every call
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> Vec<(StepKind, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StepTransformer for ScriptedTransformer {
        async fn transform(&self, kind: StepKind, text: &str) -> Result<String, TransformError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((kind, text.to_string()));
                calls.len() - 1
            };

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(error) = self.failures.get(&call) {
                return Err(error.clone());
            }

            Ok(self
                .outputs
                .get(&call)
                .cloned()
                .unwrap_or_else(|| format!("{}({})", kind, text)))
        }
    }
}
