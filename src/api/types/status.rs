//! Status response body

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{ConnectionStatus, HealthStatus, SystemStatus};

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatusResponse {
    pub status: ConnectionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /api/status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub status: HealthStatus,
    pub services: BTreeMap<String, ServiceStatusResponse>,
    pub checked_at: String,
}

impl From<SystemStatus> for StatusResponse {
    fn from(status: SystemStatus) -> Self {
        let services = status
            .services
            .into_iter()
            .map(|(name, health)| {
                (
                    name,
                    ServiceStatusResponse {
                        status: health.status,
                        message: health.message,
                    },
                )
            })
            .collect();

        Self {
            success: status.status.is_operational(),
            status: status.status,
            services,
            checked_at: status.checked_at.to_rfc3339(),
        }
    }
}
