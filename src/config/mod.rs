//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ExecutorConfig, HealthConfig, LlmConfig, LogFormat, LoggingConfig, MetricsConfig,
    ServerConfig, StorageSettings,
};
