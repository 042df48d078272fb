//! Status command - prints the composite dependency status as JSON

use anyhow::bail;

use crate::api::types::StatusResponse;
use crate::domain::SystemStatus;
use crate::infrastructure::logging::init_cli_logging;

/// Probe every dependency once and print the report. Fails when the system is unhealthy.
pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;
    init_cli_logging(&config.logging);

    let storage = crate::create_workflow_storage(&config).await?;
    let llm_provider = crate::create_llm_provider(&config)?;
    let aggregator = crate::create_health_aggregator(&config, storage, llm_provider)?;

    let status = aggregator.check().await;
    println!("{}", render(&status)?);

    if !status.status.is_operational() {
        bail!("system is {}", status.status.as_str());
    }

    Ok(())
}

fn render(status: &SystemStatus) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&StatusResponse::from(
        status.clone(),
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServiceHealth;

    #[test]
    fn test_render_degraded() {
        let status = SystemStatus::from_services(
            ServiceHealth::connected("backend"),
            ServiceHealth::connected("database").with_message("memory"),
            ServiceHealth::disconnected("llm", "LLM API key not configured"),
        );

        let json: serde_json::Value = serde_json::from_str(&render(&status).unwrap()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["services"]["llm"]["status"], "disconnected");
        assert_eq!(json["services"]["database"]["message"], "memory");
    }
}
