use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{LlmProvider, LlmRequest, StepKind, StepTransformer, TransformError};

/// Runs each step as one chat completion.
///
/// The step's instruction is the system message and the incoming text is the user
/// message. The assistant reply, trimmed, is the step output.
#[derive(Debug)]
pub struct LlmStepTransformer {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: Option<f32>,
}

impl LlmStepTransformer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, kind: StepKind, text: &str) -> LlmRequest {
        LlmRequest::instruct(kind.instruction(), text).with_temperature(self.temperature)
    }
}

#[async_trait]
impl StepTransformer for LlmStepTransformer {
    async fn transform(&self, kind: StepKind, text: &str) -> Result<String, TransformError> {
        debug!(step = %kind, model = %self.model, "Requesting transformation");

        let response = self
            .provider
            .chat(&self.model, self.build_request(kind, text))
            .await
            .map_err(|e| TransformError::provider(e.to_string()))?;

        if let Some(usage) = response.usage {
            debug!(step = %kind, tokens = usage.total(), "Transformation finished");
        }
        if response.is_truncated() {
            warn!(step = %kind, model = %response.model, "Step output was truncated by the model");
        }

        let output = response.content().trim();
        if output.is_empty() {
            return Err(TransformError::EmptyOutput);
        }

        Ok(output.to_string())
    }
}
