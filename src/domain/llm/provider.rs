use std::fmt::Debug;

use async_trait::async_trait;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// A chat completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Cheap reachability check against the provider's API
    async fn ping(&self) -> Result<(), DomainError>;

    fn provider_name(&self) -> &'static str;
}
