//! Step transformer implementations

mod llm_transformer;

pub use llm_transformer::LlmStepTransformer;
