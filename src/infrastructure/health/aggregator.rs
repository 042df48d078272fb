use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::domain::health::{LLM_SERVICE, BACKEND_SERVICE, DATABASE_SERVICE};
use crate::domain::{ConnectivityError, OrchestratorProbe, ServiceHealth, ServiceProbe, SystemStatus};
use crate::infrastructure::observability::record_health_check;

/// Message for dependencies skipped because the orchestrator gate failed
pub const NOT_CHECKED_MESSAGE: &str = "not checked: backend unreachable";

/// Combines the three dependency probes into one tiered [`SystemStatus`].
///
/// The orchestrator is probed first. If it is unreachable the store and LLM probes are
/// not issued at all. Otherwise both run concurrently, each bounded by `probe_timeout`.
/// Every call re-evaluates from scratch; nothing is cached.
pub struct HealthAggregator {
    orchestrator: Arc<dyn OrchestratorProbe>,
    store: Arc<dyn ServiceProbe>,
    llm: Arc<dyn ServiceProbe>,
    probe_timeout: Duration,
}

impl std::fmt::Debug for HealthAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthAggregator")
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

impl HealthAggregator {
    pub fn new(
        orchestrator: Arc<dyn OrchestratorProbe>,
        store: Arc<dyn ServiceProbe>,
        llm: Arc<dyn ServiceProbe>,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            orchestrator,
            store,
            llm,
            probe_timeout,
        }
    }

    pub async fn check(&self) -> SystemStatus {
        let start = Instant::now();

        let orchestrator = self.check_orchestrator().await;

        let status = if orchestrator.is_connected() {
            let (store, llm) = tokio::join!(
                self.check_service(DATABASE_SERVICE, self.store.as_ref()),
                self.check_service(LLM_SERVICE, self.llm.as_ref()),
            );
            SystemStatus::from_services(orchestrator, store, llm)
        } else {
            SystemStatus::from_services(
                orchestrator,
                ServiceHealth::disconnected(DATABASE_SERVICE, NOT_CHECKED_MESSAGE),
                ServiceHealth::disconnected(LLM_SERVICE, NOT_CHECKED_MESSAGE),
            )
        };

        record_health_check(status.status, start.elapsed());
        debug!(
            status = status.status.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Health check completed"
        );

        status
    }

    async fn check_orchestrator(&self) -> ServiceHealth {
        let result = match tokio::time::timeout(self.probe_timeout, self.orchestrator.ping()).await
        {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(BACKEND_SERVICE)),
        };

        match result {
            Ok(()) => ServiceHealth::connected(BACKEND_SERVICE),
            Err(err) => {
                warn!(service = err.target(), error = %err, "Orchestrator unreachable");
                ServiceHealth::disconnected(BACKEND_SERVICE, err.to_string())
            }
        }
    }

    async fn check_service(&self, service: &'static str, probe: &dyn ServiceProbe) -> ServiceHealth {
        let result = match tokio::time::timeout(self.probe_timeout, probe.check()).await {
            Ok(result) => result,
            Err(_) => Err(self.timed_out(service)),
        };

        if let Err(ref err) = result {
            warn!(service, error = %err, "Dependency probe failed");
        }

        ServiceHealth::from_probe(service, result)
    }

    fn timed_out(&self, service: &str) -> ConnectivityError {
        ConnectivityError::timeout(service, self.probe_timeout.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::health::{MockOrchestratorProbe, MockServiceProbe};
    use crate::domain::{ConnectionStatus, HealthStatus};
    use async_trait::async_trait;

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn orchestrator(reachable: bool) -> MockOrchestratorProbe {
        let mut probe = MockOrchestratorProbe::new();
        probe.expect_ping().times(1).returning(move || {
            if reachable {
                Ok(())
            } else {
                Err(ConnectivityError::unreachable(
                    BACKEND_SERVICE,
                    "connection refused",
                ))
            }
        });
        probe
    }

    fn service(name: &'static str, connected: bool) -> MockServiceProbe {
        let mut probe = MockServiceProbe::new();
        probe.expect_check().times(1).returning(move || {
            if connected {
                Ok(format!("{} ok", name))
            } else {
                Err(ConnectivityError::unreachable(name, "connection refused"))
            }
        });
        probe
    }

    fn never_called() -> MockServiceProbe {
        let mut probe = MockServiceProbe::new();
        probe.expect_check().times(0);
        probe
    }

    /// Probe that answers only after `delay`
    struct SlowProbe {
        delay: Duration,
    }

    #[async_trait]
    impl ServiceProbe for SlowProbe {
        async fn check(&self) -> Result<String, ConnectivityError> {
            tokio::time::sleep(self.delay).await;
            Ok("late".to_string())
        }
    }

    #[async_trait]
    impl OrchestratorProbe for SlowProbe {
        async fn ping(&self) -> Result<(), ConnectivityError> {
            tokio::time::sleep(self.delay).await;
            Ok(())
        }
    }

    fn aggregator(
        orchestrator: impl OrchestratorProbe + 'static,
        store: impl ServiceProbe + 'static,
        llm: impl ServiceProbe + 'static,
    ) -> HealthAggregator {
        HealthAggregator::new(Arc::new(orchestrator), Arc::new(store), Arc::new(llm), TIMEOUT)
    }

    #[tokio::test]
    async fn test_all_connected_is_healthy() {
        let status = aggregator(
            orchestrator(true),
            service(DATABASE_SERVICE, true),
            service(LLM_SERVICE, true),
        )
        .check()
        .await;

        assert_eq!(status.status, HealthStatus::Healthy);
        assert_eq!(status.services.len(), 3);
        assert_eq!(
            status.service(DATABASE_SERVICE).unwrap().message.as_deref(),
            Some("database ok")
        );
    }

    #[tokio::test]
    async fn test_unreachable_orchestrator_skips_other_probes() {
        let status = aggregator(orchestrator(false), never_called(), never_called())
            .check()
            .await;

        assert_eq!(status.status, HealthStatus::Unhealthy);

        let orchestrator = status.service(BACKEND_SERVICE).unwrap();
        assert_eq!(orchestrator.status, ConnectionStatus::Disconnected);
        assert_eq!(
            orchestrator.message.as_deref(),
            Some("backend unreachable: connection refused")
        );

        for name in [DATABASE_SERVICE, LLM_SERVICE] {
            let entry = status.service(name).unwrap();
            assert_eq!(entry.status, ConnectionStatus::Disconnected);
            assert_eq!(entry.message.as_deref(), Some(NOT_CHECKED_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_store_down_is_degraded() {
        let status = aggregator(
            orchestrator(true),
            service(DATABASE_SERVICE, false),
            service(LLM_SERVICE, true),
        )
        .check()
        .await;

        assert_eq!(status.status, HealthStatus::Degraded);
        assert!(!status.service(DATABASE_SERVICE).unwrap().is_connected());
        assert!(status.service(LLM_SERVICE).unwrap().is_connected());
    }

    #[tokio::test]
    async fn test_llm_down_is_degraded() {
        let status = aggregator(
            orchestrator(true),
            service(DATABASE_SERVICE, true),
            service(LLM_SERVICE, false),
        )
        .check()
        .await;

        assert_eq!(status.status, HealthStatus::Degraded);
    }

    #[tokio::test]
    async fn test_probe_timeout_is_disconnected() {
        let status = aggregator(
            orchestrator(true),
            service(DATABASE_SERVICE, true),
            SlowProbe {
                delay: Duration::from_secs(5),
            },
        )
        .check()
        .await;

        assert_eq!(status.status, HealthStatus::Degraded);
        let llm = status.service(LLM_SERVICE).unwrap();
        assert_eq!(llm.status, ConnectionStatus::Disconnected);
        assert_eq!(llm.message.as_deref(), Some("llm did not answer within 100ms"));
    }

    #[tokio::test]
    async fn test_orchestrator_timeout_is_unhealthy() {
        let status = aggregator(
            SlowProbe {
                delay: Duration::from_secs(5),
            },
            never_called(),
            never_called(),
        )
        .check()
        .await;

        assert_eq!(status.status, HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_probes_run_concurrently() {
        let slow = Duration::from_millis(100);
        let aggregator = HealthAggregator::new(
            Arc::new(orchestrator(true)),
            Arc::new(SlowProbe { delay: slow }),
            Arc::new(SlowProbe { delay: slow }),
            Duration::from_millis(500),
        );

        let start = Instant::now();
        let status = aggregator.check().await;

        assert_eq!(status.status, HealthStatus::Healthy);
        assert!(start.elapsed() < Duration::from_millis(180));
    }
}
