//! Infrastructure layer - External service implementations

pub mod health;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod services;
pub mod storage;
pub mod transform;
pub mod workflow;
