//! Health status types and the aggregation rule

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::probe::ConnectivityError;

pub const BACKEND_SERVICE: &str = "backend";
pub const DATABASE_SERVICE: &str = "database";
pub const LLM_SERVICE: &str = "llm";

/// Reachability of one dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// Overall system status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }

    /// Whether the system can serve requests at all
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::Unhealthy)
    }
}

/// Probe outcome for one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub service: String,
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceHealth {
    pub fn connected(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            status: ConnectionStatus::Connected,
            message: None,
        }
    }

    pub fn disconnected(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            status: ConnectionStatus::Disconnected,
            message: Some(message.into()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Turn a probe result into a health entry; errors become `disconnected`
    pub fn from_probe(
        service: impl Into<String>,
        result: Result<String, ConnectivityError>,
    ) -> Self {
        match result {
            Ok(detail) if detail.is_empty() => Self::connected(service),
            Ok(detail) => Self::connected(service).with_message(detail),
            Err(err) => Self::disconnected(service, err.to_string()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

/// Point-in-time snapshot of the whole system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: HealthStatus,
    pub services: BTreeMap<String, ServiceHealth>,
    pub checked_at: DateTime<Utc>,
}

impl SystemStatus {
    /// Build a snapshot from the individual entries, computing the overall tier
    pub fn from_services(
        orchestrator: ServiceHealth,
        store: ServiceHealth,
        llm: ServiceHealth,
    ) -> Self {
        let status = evaluate(orchestrator.is_connected(), &store, &llm);
        let services = [orchestrator, store, llm]
            .into_iter()
            .map(|s| (s.service.clone(), s))
            .collect();

        Self {
            status,
            services,
            checked_at: Utc::now(),
        }
    }

    pub fn service(&self, name: &str) -> Option<&ServiceHealth> {
        self.services.get(name)
    }
}

/// Aggregation rule.
///
/// An unreachable orchestrator is `Unhealthy` regardless of the other entries. Otherwise
/// any disconnected dependency is `Degraded`, and all connected is `Healthy`.
pub fn evaluate(
    orchestrator_reachable: bool,
    store: &ServiceHealth,
    llm: &ServiceHealth,
) -> HealthStatus {
    if !orchestrator_reachable {
        return HealthStatus::Unhealthy;
    }

    if store.is_connected() && llm.is_connected() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up(name: &str) -> ServiceHealth {
        ServiceHealth::connected(name)
    }

    fn down(name: &str) -> ServiceHealth {
        ServiceHealth::disconnected(name, "connection refused")
    }

    #[test]
    fn test_status_table() {
        let cases = [
            (false, up("database"), up("llm"), HealthStatus::Unhealthy),
            (false, down("database"), down("llm"), HealthStatus::Unhealthy),
            (true, up("database"), up("llm"), HealthStatus::Healthy),
            (true, down("database"), up("llm"), HealthStatus::Degraded),
            (true, up("database"), down("llm"), HealthStatus::Degraded),
            (true, down("database"), down("llm"), HealthStatus::Degraded),
        ];

        for (orchestrator, store, llm, expected) in cases {
            assert_eq!(evaluate(orchestrator, &store, &llm), expected);
        }
    }

    #[test]
    fn test_from_probe() {
        let health = ServiceHealth::from_probe("database", Ok("postgres".to_string()));
        assert!(health.is_connected());
        assert_eq!(health.message.as_deref(), Some("postgres"));

        let health = ServiceHealth::from_probe("database", Ok(String::new()));
        assert!(health.message.is_none());

        let health = ServiceHealth::from_probe(
            "llm",
            Err(ConnectivityError::timeout("llm", 250)),
        );
        assert_eq!(health.status, ConnectionStatus::Disconnected);
        assert_eq!(health.message.as_deref(), Some("llm did not answer within 250ms"));
    }

    #[test]
    fn test_system_status_from_services() {
        let status = SystemStatus::from_services(up("backend"), up("database"), down("llm"));

        assert_eq!(status.status, HealthStatus::Degraded);
        assert_eq!(status.services.len(), 3);
        assert!(status.service("database").unwrap().is_connected());
        assert!(!status.service("llm").unwrap().is_connected());
    }

    #[test]
    fn test_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
        let json = serde_json::to_value(down("database")).unwrap();
        assert_eq!(json["status"], "disconnected");
        assert_eq!(json["message"], "connection refused");
    }
}
